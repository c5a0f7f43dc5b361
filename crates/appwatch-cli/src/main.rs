//! appwatch - app update notifier CLI

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use appwatch_cli::cmd;
use appwatch_cli::{Cli, Commands};
use appwatch_core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let dry_run = cli.dry_run;

    if let Commands::Completions { shell } = cli.command {
        cmd::completions::completions(shell);
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { bind } => cmd::serve::serve(config, bind, dry_run).await,
        Commands::Notify { app_id, webhook } => {
            cmd::notify::notify(&config, &app_id, webhook).await
        }
        Commands::Check => cmd::check::check(&config, dry_run).await,
        Commands::Watch { interval } => cmd::watch::watch(&config, interval, dry_run).await,
        Commands::Completions { .. } => Ok(()),
    }
}
