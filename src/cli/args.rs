//! Command line argument parsing and validation.

use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use path_absolutize::Absolutize;
use std::path::PathBuf;

/// Package, checksum and publish cross-compiled binaries
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_release_pipeline",
    version,
    about = "Package, checksum and publish cross-compiled binaries",
    long_about = "Turn already-built binaries into archives, checksums, release notes and a published release.

Usage:
  kodegen_release_pipeline --tag v1.2.0 archive
  kodegen_release_pipeline --tag v1.2.0 release --commitish main
  kodegen_release_pipeline --tag v1.2.0 --try all --commitish main"
)]
pub struct Args {
    /// Command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to <project-dir>/release-pipeline.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dist root holding builds, archives and releases
    #[arg(long, global = true, default_value = "dist", value_name = "DIR")]
    pub dist: PathBuf,

    /// Release tag, e.g. v1.2.0
    #[arg(long, global = true)]
    pub tag: Option<String>,

    /// Project root; extra files resolve against it
    #[arg(long, global = true, default_value = ".", value_name = "DIR")]
    pub project_dir: PathBuf,

    /// Produce all local artifacts but publish nothing
    #[arg(long = "try", global = true)]
    pub try_run: bool,

    /// Number of concurrent workers (defaults to the CPU count)
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Package built binaries into archives
    Archive {
        /// Build targets to archive (glob over builds/<path>/<goos>/<goarch>)
        #[arg(long, default_value = "builds/**")]
        build_paths: String,
    },

    /// Write checksums and release notes, then publish
    Release {
        /// Revision the release is cut from
        #[arg(long)]
        commitish: String,

        /// Releases to run (glob over releases/<path>)
        #[arg(long, default_value = "releases/**")]
        paths: String,
    },

    /// Archive, then release
    All {
        /// Revision the release is cut from
        #[arg(long)]
        commitish: String,

        /// Build targets to archive
        #[arg(long, default_value = "builds/**")]
        build_paths: String,

        /// Releases to run
        #[arg(long, default_value = "releases/**")]
        paths: String,
    },
}

impl Command {
    /// Command name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Archive { .. } => "archive",
            Command::Release { .. } => "release",
            Command::All { .. } => "all",
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.tag.as_deref().is_none_or(|t| t.trim().is_empty()) {
            return Err("--tag is required".to_string());
        }

        if self.workers == Some(0) {
            return Err("--workers must be at least 1".to_string());
        }

        match &self.command {
            Command::Release { commitish, .. } | Command::All { commitish, .. }
                if commitish.trim().is_empty() =>
            {
                Err("--commitish must not be empty".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Configuration file to load
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.project_dir.join(DEFAULT_CONFIG_FILE))
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let project_dir = args
            .project_dir
            .absolutize()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|_| args.project_dir.clone());
        Self {
            output: super::OutputManager::new(args.quiet).with_base_dir(project_dir),
        }
    }
}
