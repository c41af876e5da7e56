//! Asset uploads with retry.

use super::{ReleaseClient, ReleaseId, ReleaseInfo};
use crate::config::RetryConfig;
use crate::error::{ErrorExt, PublishError, ReleaseError, Result};
use std::future::Future;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// An open file ready to be streamed to a provider
#[derive(Debug)]
pub struct Asset {
    /// Asset name on the release
    pub name: String,
    /// Content length in bytes
    pub size: u64,
    /// Handle positioned at offset zero
    pub file: tokio::fs::File,
}

/// Open `path` as an asset named after its file name
pub async fn open_asset(path: &Path) -> Result<Asset> {
    let file = tokio::fs::File::open(path)
        .await
        .fs_context("opening release asset", path)?;
    let size = file
        .metadata()
        .await
        .fs_context("reading release asset metadata", path)?
        .len();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Asset { name, size, file })
}

/// Retry an async operation with exponential backoff
///
/// Only recoverable errors are retried. The delay starts at
/// `config.base_delay`, doubles after every failure and is capped at
/// `config.max_delay`. Cancellation is observed before every attempt and while
/// waiting between attempts.
///
/// # Arguments
/// * `operation` - Async closure that returns Result<T>; called once per attempt
/// * `max_retries` - Maximum number of retry attempts (0 = try once, no retries)
/// * `operation_name` - Human-readable name for logging
pub async fn retry_with_backoff<F, T, Fut>(
    token: &CancellationToken,
    config: &RetryConfig,
    max_retries: u32,
    operation_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempts = 0u32;

    loop {
        if token.is_cancelled() {
            return Err(ReleaseError::Cancelled);
        }

        match operation().await {
            Ok(result) => {
                if attempts > 0 {
                    log::info!("{operation_name} succeeded after {attempts} retry(ies)");
                }
                return Ok(result);
            }
            Err(e) => {
                if !e.is_recoverable() {
                    log::debug!("{operation_name} failed with unrecoverable error: {e}");
                    return Err(e);
                }
                if attempts >= max_retries {
                    log::warn!("{operation_name} failed after {} attempt(s): {e}", attempts + 1);
                    return Err(e);
                }

                attempts += 1;

                let factor = 2u32.saturating_pow(attempts - 1);
                let wait = config
                    .base_delay
                    .checked_mul(factor)
                    .unwrap_or(config.max_delay)
                    .min(config.max_delay);

                log::warn!(
                    "{operation_name} failed (attempt {attempts}/{}): {e}; retrying in {:.1}s",
                    max_retries + 1,
                    wait.as_secs_f64()
                );

                tokio::select! {
                    _ = token.cancelled() => return Err(ReleaseError::Cancelled),
                    _ = tokio::time::sleep(wait) => {}
                }
            }
        }
    }
}

/// Upload one asset, reopening it through `open` for every attempt.
///
/// Transient failures are retried up to `config.file_uploads` times; running
/// out of attempts is reported as [`PublishError::RetriesExhausted`].
pub async fn upload_asset_with_retries<F, Fut>(
    token: &CancellationToken,
    client: &dyn ReleaseClient,
    info: &ReleaseInfo,
    id: ReleaseId,
    config: &RetryConfig,
    asset_name: &str,
    open: F,
) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Asset>>,
{
    let operation_name = format!("Upload of {asset_name}");
    let open = &open;
    let result = retry_with_backoff(token, config, config.file_uploads, &operation_name, || async move {
        let asset = open().await?;
        client.upload_asset(info, id, asset).await
    })
    .await;

    match result {
        Err(e) if e.is_recoverable() => Err(PublishError::RetriesExhausted {
            asset: asset_name.to_string(),
            attempts: config.file_uploads + 1,
            last_error: e.to_string(),
        }
        .into()),
        other => other,
    }
}
