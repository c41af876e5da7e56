//! Release pipeline - package, checksum and publish cross-compiled binaries.

use kodegen_release_pipeline::cli;
use kodegen_release_pipeline::cli::OutputManager;
use std::process;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    env_logger::init();

    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling running tasks");
            on_interrupt.cancel();
        }
    });

    match cli::run(token).await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Never quiet for fatal errors
            let output = OutputManager::new(false);
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                output.eprintln("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    output.eprintln(&format!("    {suggestion}"));
                }
            }

            process::exit(1);
        }
    }
}
