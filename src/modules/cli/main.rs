//! Tributary CLI
//!
//! Command-line interface for the Tributary question answering service.

use clap::Parser;
use tributary_cli::{Cli, Commands};
use tributary_core::TributaryError;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), TributaryError> {
    let cli = Cli::parse();

    // Completion output goes to stdout and must not be mixed with log lines
    if let Commands::Completion(cmd) = &cli.command {
        cmd.execute();
        return Ok(());
    }

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config_path = cli.config_path();

    // Execute command
    match &cli.command {
        Commands::Run(cmd) => {
            cmd.execute(config_path).await?;
        }
        Commands::Ingest(cmd) => {
            cmd.execute(config_path).await?;
        }
        Commands::Ask(cmd) => {
            cmd.execute(config_path).await?;
        }
        Commands::Completion(_) => {}
    }

    Ok(())
}
