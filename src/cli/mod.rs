//! Command line interface for the release pipeline.
//!
//! Parses flags, builds the shared pipeline state and dispatches to the
//! archive and release stages with colored user feedback.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, RuntimeConfig};
pub use commands::execute_command;
pub use output::OutputManager;

use crate::error::Result;
use tokio_util::sync::CancellationToken;

/// Main CLI entry point
pub async fn run(token: CancellationToken) -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args, token).await
}
