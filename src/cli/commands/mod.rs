//! Command execution functions coordinating the pipeline stages.

use crate::cli::{Args, Command, RuntimeConfig};
use crate::config::{Config, EnvConfig, compile_pattern};
use crate::error::Result;
use crate::pipeline::{Core, ReleaseOutcome, run_archives, run_releases};
use crate::workforce::Workforce;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Execute the command described by `args`, returning the process exit code
pub async fn execute_command(args: Args, token: CancellationToken) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        let output = super::OutputManager::new(false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);

    match run_command(&args, &config, &token).await {
        Ok(()) => Ok(0),
        Err(e) => {
            config.output().error(&format!(
                "Command '{}' failed: {}",
                args.command.name(),
                e
            ));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.output().eprintln("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.output().eprintln(&format!("  • {}", suggestion));
                }
            }

            Ok(1)
        }
    }
}

fn build_core(args: &Args) -> Result<Core> {
    let config_path = args.config_path();
    let config = Config::load(&config_path)?;
    let env = EnvConfig::from_env();
    let workers = args
        .workers
        .or_else(|| env.workers())
        .unwrap_or_else(num_cpus::get);
    log::debug!("Using {workers} worker(s)");

    Core::new(
        config,
        env,
        Workforce::new(workers),
        &args.dist,
        &args.project_dir,
        args.tag.clone().unwrap_or_default(),
        args.try_run,
    )
}

async fn run_command(args: &Args, config: &RuntimeConfig, token: &CancellationToken) -> Result<()> {
    let core = build_core(args)?;

    if core.try_run {
        let _ = config
            .output()
            .warn("Try mode: artifacts are produced locally, nothing is published");
    }

    let result = match &args.command {
        Command::Archive { build_paths } => execute_archive(&core, config, token, build_paths)
            .await
            .map(|_| ()),
        Command::Release { commitish, paths } => {
            execute_release(&core, config, token, commitish, paths)
                .await
                .map(|_| ())
        }
        Command::All {
            commitish,
            build_paths,
            paths,
        } => execute_all(&core, config, token, commitish, build_paths, paths).await,
    };

    if token.is_cancelled() {
        core.workforce.shutdown();
    }
    result
}

async fn execute_all(
    core: &Core,
    config: &RuntimeConfig,
    token: &CancellationToken,
    commitish: &str,
    build_paths: &str,
    paths: &str,
) -> Result<()> {
    execute_archive(core, config, token, build_paths).await?;
    execute_release(core, config, token, commitish, paths).await?;
    Ok(())
}

async fn execute_archive(
    core: &Core,
    config: &RuntimeConfig,
    token: &CancellationToken,
    build_paths: &str,
) -> Result<Vec<PathBuf>> {
    let _ = config.output().section("Archive");
    let filter = compile_pattern(build_paths)?;
    let archives = run_archives(core, token, &filter).await?;

    let _ = config
        .output()
        .success(&format!("Created {} archive(s)", archives.len()));
    for archive in &archives {
        let _ = config.output().artifact(archive);
    }
    Ok(archives)
}

async fn execute_release(
    core: &Core,
    config: &RuntimeConfig,
    token: &CancellationToken,
    commitish: &str,
    paths: &str,
) -> Result<Vec<ReleaseOutcome>> {
    let _ = config.output().section("Release");
    let filter = compile_pattern(paths)?;
    let outcomes = run_releases(core, token, commitish, &filter).await?;

    for outcome in &outcomes {
        let _ = config.output().success(&format!(
            "Release {} (id {}): {} file(s) uploaded",
            outcome.path,
            outcome.release_id,
            outcome.assets.len()
        ));
        for asset in &outcome.assets {
            let _ = config.output().artifact(asset);
        }
    }
    Ok(outcomes)
}
