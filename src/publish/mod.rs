//! Release publication.
//!
//! A [`ReleaseClient`] creates one release record per release target and
//! uploads assets to it. Providers that can map commit authors to account
//! names additionally expose a [`UsernameResolver`] through
//! [`ReleaseClient::username_resolver`].

mod fake;
mod github;
mod upload;

pub use fake::FakeClient;
pub use github::GitHubClient;
pub use upload::{Asset, open_asset, retry_with_backoff, upload_asset_with_retries};

use crate::config::{EnvConfig, ReleaseSettings, ReleaseType};
use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Provider handle of a created release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReleaseId(pub u64);

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a provider needs to create one release
#[derive(Debug, Clone)]
pub struct ReleaseInfo {
    /// Project name
    pub project: String,
    /// Tag to create or attach to
    pub tag: String,
    /// Revision the tag points at
    pub commitish: String,
    /// Provider settings
    pub settings: ReleaseSettings,
    /// Markdown file used as the release body
    pub release_notes: Option<PathBuf>,
}

/// A release hosting provider
#[async_trait]
pub trait ReleaseClient: Send + Sync {
    /// Provider name used in logs and errors
    fn provider(&self) -> &str;

    /// Create the release record
    async fn release(&self, info: &ReleaseInfo) -> Result<ReleaseId>;

    /// Upload one asset to a created release
    async fn upload_asset(&self, info: &ReleaseInfo, id: ReleaseId, asset: Asset) -> Result<()>;

    /// Username lookup, for providers that support it
    fn username_resolver(&self) -> Option<&dyn UsernameResolver> {
        None
    }
}

/// Maps commit authors to provider account names
#[async_trait]
pub trait UsernameResolver: Send + Sync {
    /// Account name of the author of `commit`, if known
    async fn resolve_username(
        &self,
        info: &ReleaseInfo,
        commit: &str,
        author_email: &str,
    ) -> Result<Option<String>>;
}

/// Create the real client for `release_type`
pub fn new_client(release_type: ReleaseType, env: &EnvConfig) -> Result<Arc<dyn ReleaseClient>> {
    match release_type {
        ReleaseType::GitHub => Ok(Arc::new(GitHubClient::from_env(env)?)),
    }
}
