use super::{Asset, ReleaseClient, ReleaseId, ReleaseInfo};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Client that publishes nothing, used for try runs
#[derive(Debug, Default)]
pub struct FakeClient {
    releases: AtomicUsize,
    uploads: Mutex<Vec<String>>,
}

impl FakeClient {
    /// Create a fake client
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of releases "created"
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Names of the assets "uploaded", in completion order
    pub fn uploaded(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ReleaseClient for FakeClient {
    fn provider(&self) -> &str {
        "fake"
    }

    async fn release(&self, info: &ReleaseInfo) -> Result<ReleaseId> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        log::info!("[try] Would create release {} from {}", info.tag, info.commitish);
        Ok(ReleaseId(1))
    }

    async fn upload_asset(&self, _info: &ReleaseInfo, id: ReleaseId, asset: Asset) -> Result<()> {
        log::info!("[try] Would upload {} ({} bytes) to release {id}", asset.name, asset.size);
        self.uploads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(asset.name);
        Ok(())
    }
}
