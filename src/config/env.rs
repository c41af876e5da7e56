//! Environment snapshot and retry configuration.
//!
//! The environment is read once at startup into an [`EnvConfig`] so that the
//! pipeline never reads process-global state in the middle of a run, and tests
//! can supply their own values.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Overrides the repository the changelog is collected from
pub const ENV_CHANGELOG_GITREPO: &str = "KODEGEN_RELEASE_CHANGELOG_GITREPO";
/// Maximum upload retries
pub const ENV_RETRIES: &str = "KODEGEN_RELEASE_RETRIES";
/// Worker pool size
pub const ENV_WORKERS: &str = "KODEGEN_RELEASE_WORKERS";

const ENV_KEYS: &[&str] = &[
    ENV_CHANGELOG_GITREPO,
    ENV_RETRIES,
    ENV_WORKERS,
    "GITHUB_TOKEN",
    "GH_TOKEN",
];

/// Snapshot of the environment variables the pipeline cares about
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Capture the relevant variables from the process environment
    pub fn from_env() -> Self {
        Self::from_pairs(
            ENV_KEYS
                .iter()
                .filter_map(|key| std::env::var(key).ok().map(|value| (*key, value))),
        )
    }

    /// Build a snapshot from explicit pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .filter(|(_, v): &(String, String)| !v.is_empty())
                .collect(),
        }
    }

    /// Get a variable
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    /// Repository override for changelog collection
    pub fn changelog_repo(&self) -> Option<PathBuf> {
        self.get(ENV_CHANGELOG_GITREPO).map(PathBuf::from)
    }

    /// Worker pool size override
    pub fn workers(&self) -> Option<usize> {
        self.get(ENV_WORKERS)
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
    }

    /// Retry configuration with environment overrides applied
    pub fn retry_config(&self) -> RetryConfig {
        let defaults = RetryConfig::default();
        RetryConfig {
            file_uploads: self
                .get(ENV_RETRIES)
                .and_then(|s| s.parse::<u32>().ok())
                .map(|v| v.min(RetryConfig::MAX_RETRIES))
                .unwrap_or(defaults.file_uploads),
            ..defaults
        }
    }
}

/// Retry limits for network operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Max retries for release creation
    pub release_creation: u32,

    /// Max retries for asset uploads
    pub file_uploads: u32,

    /// Delay before the first retry; doubles on every further attempt
    pub base_delay: Duration,

    /// Upper bound for a single backoff delay
    pub max_delay: Duration,
}

impl RetryConfig {
    /// Upper bound accepted from the environment
    pub const MAX_RETRIES: u32 = 20;

    /// Same limits without any waiting between attempts
    pub fn without_delay(self) -> Self {
        Self {
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            ..self
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            release_creation: 3,
            file_uploads: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_are_clamped() {
        let env = EnvConfig::from_pairs([(ENV_RETRIES, "500")]);
        assert_eq!(env.retry_config().file_uploads, RetryConfig::MAX_RETRIES);

        let env = EnvConfig::from_pairs([(ENV_RETRIES, "not-a-number")]);
        assert_eq!(env.retry_config().file_uploads, 5);
    }

    #[test]
    fn empty_values_are_ignored() {
        let env = EnvConfig::from_pairs([(ENV_CHANGELOG_GITREPO, ""), (ENV_WORKERS, "0")]);
        assert!(env.changelog_repo().is_none());
        assert!(env.workers().is_none());

        let env = EnvConfig::from_pairs([(ENV_WORKERS, "3")]);
        assert_eq!(env.workers(), Some(3));
    }
}
