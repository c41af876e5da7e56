//! Release stage: checksums, release notes and publication.

use super::{Core, recreate_dir};
use crate::changelog::{CollectOptions, ResolveUsername, collect_changes, group_by_rules};
use crate::checksum::write_checksum_file;
use crate::config::{Release, ReleaseSettings};
use crate::error::{CliError, ConfigError, ReleaseError, Result};
use crate::notes::write_release_notes;
use crate::publish::{
    FakeClient, ReleaseClient, ReleaseId, ReleaseInfo, UsernameResolver, new_client, open_asset,
    retry_with_backoff, upload_asset_with_retries,
};
use async_trait::async_trait;
use glob::Pattern;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Creates the client for a release target
pub type ClientFactory = dyn Fn(&ReleaseSettings) -> Result<Arc<dyn ReleaseClient>> + Send + Sync;

/// What one release target produced
#[derive(Debug, Clone)]
pub struct ReleaseOutcome {
    /// Release path
    pub path: String,
    /// Release output directory
    pub release_dir: PathBuf,
    /// Provider handle of the created release
    pub release_id: ReleaseId,
    /// Uploaded files, in scheduling order
    pub assets: Vec<PathBuf>,
    /// Written checksum file
    pub checksum_file: PathBuf,
    /// Release body, generated or configured
    pub release_notes: Option<PathBuf>,
}

/// Adapts a provider's username lookup to the changelog collector
struct ClientUsernames<'a> {
    resolver: &'a dyn UsernameResolver,
    info: &'a ReleaseInfo,
}

#[async_trait]
impl ResolveUsername for ClientUsernames<'_> {
    async fn resolve_username(&self, commit: &str, author_email: &str) -> Result<Option<String>> {
        self.resolver
            .resolve_username(self.info, commit, author_email)
            .await
    }
}

/// Run every release matching `paths`.
///
/// In try mode only the fake client is used and no real client is created.
pub async fn run_releases(
    core: &Core,
    token: &CancellationToken,
    commitish: &str,
    paths: &Pattern,
) -> Result<Vec<ReleaseOutcome>> {
    if core.try_run {
        let fake: Arc<dyn ReleaseClient> = Arc::new(FakeClient::new());
        let factory = move |_: &ReleaseSettings| -> Result<Arc<dyn ReleaseClient>> { Ok(fake.clone()) };
        run_releases_with(core, token, commitish, paths, &factory).await
    } else {
        let env = core.env.clone();
        let factory = move |settings: &ReleaseSettings| new_client(settings.release_type, &env);
        run_releases_with(core, token, commitish, paths, &factory).await
    }
}

/// [`run_releases`] with an explicit client factory
pub async fn run_releases_with(
    core: &Core,
    token: &CancellationToken,
    commitish: &str,
    paths: &Pattern,
    factory: &ClientFactory,
) -> Result<Vec<ReleaseOutcome>> {
    if commitish.trim().is_empty() {
        return Err(CliError::MissingArgument {
            argument: "--commitish".to_string(),
        }
        .into());
    }

    let releases = core.config.find_releases(paths);
    if releases.is_empty() {
        return Err(ConfigError::NoReleasesMatched {
            paths: paths.as_str().to_string(),
        }
        .into());
    }
    for release in &releases {
        release.settings.validate()?;
    }

    let mut outcomes = Vec::with_capacity(releases.len());
    for release in releases {
        if token.is_cancelled() {
            return Err(ReleaseError::Cancelled);
        }
        outcomes.push(run_release(core, token, commitish, release, factory).await?);
    }
    Ok(outcomes)
}

fn release_files(core: &Core, release: &Release) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for archive in &core.config.archives {
        for arch in archive.archs.iter().filter(|a| release.matches_archive(a)) {
            files.push(core.archive_path(archive, arch)?);
        }
    }
    Ok(files)
}

async fn run_release(
    core: &Core,
    token: &CancellationToken,
    commitish: &str,
    release: &Release,
    factory: &ClientFactory,
) -> Result<ReleaseOutcome> {
    let release_dir = core.release_dir(&release.path);
    recreate_dir(&release_dir).await?;

    let mut assets = release_files(core, release)?;
    if assets.is_empty() {
        return Err(ConfigError::NoArchivesForRelease {
            path: release.path.clone(),
        }
        .into());
    }

    let checksum_file = write_checksum_file(&core.workforce, token, &release_dir, &assets).await?;
    log::info!("Created checksum file {}", checksum_file.display());
    assets.push(checksum_file.clone());

    let client = factory(&release.settings)?;
    let mut info = ReleaseInfo {
        project: core.config.project.clone(),
        tag: core.tag.clone(),
        commitish: commitish.to_string(),
        settings: release.settings.clone(),
        release_notes: None,
    };

    let notes_settings = &release.settings.release_notes_settings;
    if notes_settings.generate {
        let repo_path = core
            .env
            .changelog_repo()
            .unwrap_or_else(|| core.project_dir.clone());
        let options = CollectOptions {
            tag: core.tag.clone(),
            commitish: commitish.to_string(),
            repo_path,
        };

        let changes = {
            let usernames = client.username_resolver().map(|resolver| ClientUsernames {
                resolver,
                info: &info,
            });
            collect_changes(
                &options,
                usernames.as_ref().map(|u| u as &dyn ResolveUsername),
            )
            .await?
        };

        let groups = group_by_rules(changes, &notes_settings.groups);
        let notes = write_release_notes(&release_dir, &groups).await?;
        log::info!("Created release notes {}", notes.display());
        assets.push(notes.clone());
        info.release_notes = Some(notes);
    } else if let Some(filename) = &notes_settings.filename {
        info.release_notes = Some(core.project_dir.join(filename));
    }

    log::info!(
        "Prepared {} file(s) for release {} via {}",
        assets.len(),
        release.path,
        client.provider()
    );

    let retry = core.env.retry_config();
    let release_client: &dyn ReleaseClient = client.as_ref();
    let info_ref = &info;
    let release_id = retry_with_backoff(
        token,
        &retry,
        retry.release_creation,
        "Release creation",
        move || release_client.release(info_ref),
    )
    .await?;

    let info = Arc::new(info);
    let (mut runner, task_token) = core.workforce.start(token);
    for path in &assets {
        let client = client.clone();
        let info = info.clone();
        let retry = retry.clone();
        let token = task_token.clone();
        let path = path.clone();

        runner.run(async move {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            log::info!("Uploading release file {}", path.display());

            let source = path.as_path();
            upload_asset_with_retries(
                &token,
                client.as_ref(),
                &info,
                release_id,
                &retry,
                &name,
                move || open_asset(source),
            )
            .await
        });
    }
    runner.wait().await?;

    Ok(ReleaseOutcome {
        path: release.path.clone(),
        release_dir,
        release_id,
        assets,
        checksum_file,
        release_notes: info.release_notes.clone(),
    })
}
