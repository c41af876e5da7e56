//! Error types for release pipeline operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release pipeline operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release pipeline operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Archive construction errors
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Changelog collection errors
    #[error("Changelog error: {0}")]
    Changelog(#[from] ChangelogError),

    /// Release publishing errors
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// File system error with path context
    #[error("{context} {path}: {error}")]
    Fs {
        /// Operation that failed (e.g. "creating checksum file")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: std::io::Error,
    },

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Template rendering errors
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// A task observed cancellation and gave up its work
    #[error("Operation cancelled")]
    Cancelled,

    /// A scheduled task panicked or was aborted by the runtime
    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {reason}")]
    ReadFailed {
        /// Path to the configuration file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// A required field is missing or empty
    #[error("Missing required config field '{field}'")]
    MissingField {
        /// Field name
        field: String,
    },

    /// Glob pattern failed to compile
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlob {
        /// The pattern as written in the config
        pattern: String,
        /// Reason for the error
        reason: String,
    },

    /// Release notes group regexp failed to compile
    #[error("Invalid regexp '{pattern}': {reason}")]
    InvalidRegexp {
        /// The pattern as written in the config
        pattern: String,
        /// Reason for the error
        reason: String,
    },

    /// Archive name template failed to compile
    #[error("Invalid name template '{template}': {reason}")]
    InvalidTemplate {
        /// The template as written in the config
        template: String,
        /// Reason for the error
        reason: String,
    },

    /// Unknown archive format
    #[error("Unsupported archive format '{format}' (expected one of: tar.gz, zip)")]
    UnsupportedFormat {
        /// Format string
        format: String,
    },

    /// Unknown release provider type
    #[error("Unsupported release type '{release_type}' (expected one of: github)")]
    UnsupportedReleaseType {
        /// Release type string
        release_type: String,
    },

    /// Both release notes generation and a release notes file were configured
    #[error(
        "both release_notes_settings.generate and release_notes_settings.filename are set for release type '{release_type}'"
    )]
    ConflictingReleaseNotes {
        /// Release type string
        release_type: String,
    },

    /// No release matched the requested paths filter
    #[error("no releases found matching paths '{paths}'")]
    NoReleasesMatched {
        /// The paths filter
        paths: String,
    },

    /// Two archive groups would write into the same output directory
    #[error("archive groups '{first}' and '{second}' both match build target '{path}'")]
    OverlappingArchives {
        /// Paths filter of the earlier group
        first: String,
        /// Paths filter of the later group
        second: String,
        /// Build target path both groups match
        path: String,
    },

    /// A release resolved to zero archives
    #[error("no files found for release '{path}'")]
    NoArchivesForRelease {
        /// Release path
        path: String,
    },
}

/// Archive construction errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Expected binary is not on disk
    #[error("binary file not found: {path}")]
    BinaryNotFound {
        /// Expected binary location
        path: PathBuf,
    },

    /// Archive request carried no files
    #[error("archive request for {path} contains no files")]
    EmptyRequest {
        /// Output archive path
        path: PathBuf,
    },

    /// Source file could not be added to the archive
    #[error("failed to add {source_path} as '{target}': {error}")]
    AddFailed {
        /// Source file on disk
        source_path: PathBuf,
        /// Target path inside the archive
        target: String,
        /// The underlying I/O error
        error: std::io::Error,
    },

    /// A layer failed while closing the archive
    #[error("failed to close {layer} of archive {path}: {error}")]
    CloseFailed {
        /// Layer that failed (archive body, compression, output)
        layer: &'static str,
        /// Output archive path
        path: PathBuf,
        /// The underlying I/O error
        error: std::io::Error,
    },
}

/// Changelog collection errors
#[derive(Error, Debug)]
pub enum ChangelogError {
    /// Repository could not be opened
    #[error("Failed to open git repository at {path}: {reason}")]
    OpenFailed {
        /// Repository path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// A revision could not be resolved
    #[error("Failed to resolve revision '{revision}': {reason}")]
    RevisionNotFound {
        /// Revision that failed to resolve
        revision: String,
        /// Reason for the error
        reason: String,
    },

    /// Walking history failed
    #[error("Failed to walk commit history: {reason}")]
    WalkFailed {
        /// Reason for the error
        reason: String,
    },

    /// Username resolution failed
    #[error("Failed to resolve username for commit {commit}: {reason}")]
    ResolveFailed {
        /// Commit hash
        commit: String,
        /// Reason for the error
        reason: String,
    },
}

/// Publishing errors
#[derive(Error, Debug)]
pub enum PublishError {
    /// Provider credentials missing
    #[error("{provider} token not provided. Set {variables} environment variable")]
    MissingToken {
        /// Provider name
        provider: String,
        /// Environment variables consulted
        variables: String,
    },

    /// Temporary failure (network, 5xx, rate limit), safe to retry
    #[error("{provider} {operation} failed transiently: {reason}")]
    Transient {
        /// Provider name
        provider: String,
        /// Operation that failed
        operation: String,
        /// Reason for the error
        reason: String,
    },

    /// Provider rejected the request, retrying will not help
    #[error("{provider} {operation} rejected: {reason}")]
    Rejected {
        /// Provider name
        provider: String,
        /// Operation that failed
        operation: String,
        /// Reason for the error
        reason: String,
    },

    /// Retries exhausted
    #[error("uploading {asset} failed after {attempts} attempt(s): {last_error}")]
    RetriesExhausted {
        /// Asset file name
        asset: String,
        /// Number of attempts made
        attempts: u32,
        /// Error of the final attempt
        last_error: String,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Archive(ArchiveError::BinaryNotFound { path }) => vec![
                format!("Build the binary expected at {}", path.display()),
                "Check the builds section of the config against your build output".to_string(),
            ],
            ReleaseError::Config(ConfigError::ConflictingReleaseNotes { .. }) => vec![
                "Remove either release_notes_settings.generate or release_notes_settings.filename"
                    .to_string(),
            ],
            ReleaseError::Config(ConfigError::OverlappingArchives { .. }) => vec![
                "Narrow the paths of the archive groups so each build target is archived once"
                    .to_string(),
            ],
            ReleaseError::Config(ConfigError::NoArchivesForRelease { .. })
            | ReleaseError::Config(ConfigError::NoReleasesMatched { .. }) => vec![
                "Run the archive command first".to_string(),
                "Check the paths filters in the releases section of the config".to_string(),
            ],
            ReleaseError::Publish(PublishError::MissingToken { variables, .. }) => vec![
                format!("Export one of: {variables}"),
                "Use --try to produce local artifacts without publishing".to_string(),
            ],
            ReleaseError::Publish(PublishError::RetriesExhausted { .. })
            | ReleaseError::Publish(PublishError::Transient { .. }) => vec![
                "Check network connectivity and provider status".to_string(),
                "Raise KODEGEN_RELEASE_RETRIES to allow more upload attempts".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable by retrying the same operation
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ReleaseError::Publish(PublishError::Transient { .. }))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| ReleaseError::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_not_found_names_the_path() {
        let err = ReleaseError::from(ArchiveError::BinaryNotFound {
            path: PathBuf::from("/dist/p/v1/builds/unix/linux/amd64/p"),
        });
        let msg = err.to_string();
        assert!(msg.contains("binary file not found"));
        assert!(msg.contains("/dist/p/v1/builds/unix/linux/amd64/p"));
    }

    #[test]
    fn only_transient_errors_are_recoverable() {
        let transient = ReleaseError::from(PublishError::Transient {
            provider: "github".into(),
            operation: "upload".into(),
            reason: "502".into(),
        });
        let rejected = ReleaseError::from(PublishError::Rejected {
            provider: "github".into(),
            operation: "upload".into(),
            reason: "422".into(),
        });
        assert!(transient.is_recoverable());
        assert!(!rejected.is_recoverable());
        assert!(!ReleaseError::Cancelled.is_recoverable());
    }

    #[test]
    fn fs_context_keeps_path() {
        let res: std::io::Result<()> = Err(std::io::Error::other("boom"));
        let err = res.fs_context("creating checksum file", "/tmp/x").unwrap_err();
        assert_eq!(err.to_string(), "creating checksum file /tmp/x: boom");
    }
}
