//! Archive stage: one archive per (archive group, build target).

use super::{Core, recreate_dir};
use crate::archive::{self, ArchiveFile, ArchiveRequest};
use crate::error::{ArchiveError, Result};
use glob::Pattern;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

fn binary_target_path(binary_dir: &str, binary: &str) -> String {
    if binary_dir.is_empty() {
        binary.to_string()
    } else {
        format!("{binary_dir}/{binary}")
    }
}

/// Build every archive whose build target matches `build_paths`.
///
/// Each target runs as its own pool task. A failing target (a name that does
/// not render, a missing binary) does not stop its siblings; the first failure
/// is returned once all targets finished. Returns the archive paths in
/// configuration order.
pub async fn run_archives(
    core: &Core,
    token: &CancellationToken,
    build_paths: &Pattern,
) -> Result<Vec<PathBuf>> {
    let (mut runner, task_token) = core.workforce.start(token);
    let mut outputs = Vec::new();

    for (archive, arch) in core.config.archive_archs(build_paths) {
        let out_dir = core.archive_dir(arch);
        let out_filename = match core.archive_path(archive, arch) {
            Ok(path) => path,
            Err(e) => {
                // Reported through the pool so that targets already scheduled still finish.
                log::warn!("Cannot name archive for {}: {e}", arch.path);
                runner.run(async move { Err(e) });
                continue;
            }
        };
        let binary = core.binary_path(arch);
        let settings = archive.settings.clone();

        let mut files = vec![ArchiveFile {
            source_path_abs: binary.clone(),
            target_path: binary_target_path(&settings.binary_dir, &arch.binary),
        }];
        files.extend(settings.extra_files.iter().map(|extra| ArchiveFile {
            source_path_abs: core.project_dir.join(&extra.source_path),
            target_path: extra.target_path.clone(),
        }));

        log::info!("Archive {}", out_filename.display());
        outputs.push(out_filename.clone());

        let token = task_token.clone();
        runner.run(async move {
            recreate_dir(&out_dir).await?;

            if !tokio::fs::try_exists(&binary).await.unwrap_or(false) {
                return Err(ArchiveError::BinaryNotFound { path: binary }.into());
            }

            archive::build(
                ArchiveRequest {
                    settings,
                    out_filename,
                    files,
                },
                token,
            )
            .await
        });
    }

    runner.wait().await?;
    Ok(outputs)
}
