//! # Release Pipeline
//!
//! Concurrent archive and release pipeline for cross-compiled binaries.
//!
//! Given binaries already built under `<dist>/<project>/<tag>/builds/`, the
//! pipeline packages them into archives, writes checksums and release notes,
//! and publishes everything to a release provider.
//!
//! ## Features
//!
//! - **Bounded Concurrency**: One worker pool caps blocking work across all stages
//! - **Safe Archives**: tar.gz and zip output with an ordered close chain; nothing half-written is left behind
//! - **Checksums**: SHA-256 `checksum.txt` per release, in a stable order
//! - **Release Notes**: Changelog collected with gix and grouped by configurable rules
//! - **Retried Uploads**: Transient provider failures retried with a fresh file handle
//! - **Try Mode**: Produce every local artifact without publishing
//!
//! ## Usage
//!
//! ```bash
//! kodegen_release_pipeline --tag v1.2.0 archive
//! kodegen_release_pipeline --tag v1.2.0 release --commitish main
//! kodegen_release_pipeline --tag v1.2.0 --try all --commitish main
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod archive;
pub mod changelog;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod error;
pub mod notes;
pub mod pipeline;
pub mod publish;
pub mod workforce;

// Re-export main types for public API
pub use archive::{ArchiveFile, ArchiveFormat, ArchiveRequest, ArchiveWriter};
pub use cli::Args;
pub use config::{Config, EnvConfig, RetryConfig};
pub use error::{CliError, ReleaseError, Result};
pub use pipeline::{Core, ReleaseOutcome, run_archives, run_releases};
pub use publish::{FakeClient, GitHubClient, ReleaseClient, ReleaseId, ReleaseInfo};
pub use workforce::{Runner, Workforce};
