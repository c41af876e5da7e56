//! SHA-256 checksum file generation.

use crate::error::{ErrorExt, ReleaseError, Result};
use crate::workforce::Workforce;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Name of the checksum file written into each release directory
pub const CHECKSUM_FILENAME: &str = "checksum.txt";

/// Hash a file in 8 KiB chunks, checking for cancellation between chunks
pub async fn sha256_file(path: &Path, token: &CancellationToken) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for checksum", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        if token.is_cancelled() {
            return Err(ReleaseError::Cancelled);
        }
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for checksum", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

fn checksum_line(digest: &str, path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    format!("{digest}  {name}")
}

/// Produce one `"<hex digest>  <base name>"` line per file, in input order.
///
/// Files are hashed concurrently on the workforce; a failure of any file is
/// reported once all hashing tasks finished.
pub async fn create_checksum_lines(
    workforce: &Workforce,
    token: &CancellationToken,
    files: &[PathBuf],
) -> Result<Vec<String>> {
    let (mut runner, task_token) = workforce.start(token);
    let mut receivers = Vec::with_capacity(files.len());

    for path in files {
        let (tx, rx) = oneshot::channel();
        receivers.push(rx);

        let path = path.clone();
        let token = task_token.clone();
        runner.run(async move {
            let digest = sha256_file(&path, &token).await?;
            // The receiver only goes away if the whole batch was abandoned.
            let _ = tx.send(checksum_line(&digest, &path));
            Ok(())
        });
    }

    runner.wait().await?;

    let mut lines = Vec::with_capacity(receivers.len());
    for rx in receivers {
        let line = rx.await.map_err(|_| ReleaseError::Cancelled)?;
        lines.push(line);
    }
    Ok(lines)
}

/// Hash `files` and write the checksum file into `dir`, returning its path
pub async fn write_checksum_file(
    workforce: &Workforce,
    token: &CancellationToken,
    dir: &Path,
    files: &[PathBuf],
) -> Result<PathBuf> {
    let lines = create_checksum_lines(workforce, token, files).await?;
    let out = dir.join(CHECKSUM_FILENAME);

    let mut content = lines.join("\n");
    content.push('\n');
    tokio::fs::write(&out, content)
        .await
        .fs_context("writing checksum file", &out)?;

    log::debug!("Wrote {} checksum(s) to {}", lines.len(), out.display());
    Ok(out)
}
