//! CLI commands

mod ask;
mod completion;
mod ingest;
mod run;

pub use ask::AskCommand;
pub use completion::CompletionCommand;
pub use ingest::IngestCommand;
pub use run::RunCommand;

use clap::{Parser, Subcommand};
use tributary_core::{Settings, TributaryError};
use tracing::info;

/// Tributary - answers questions from SQL databases and documents at once
#[derive(Parser, Debug)]
#[command(name = "tributary")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (YAML)
    ///
    /// When omitted, settings are read from environment variables and an
    /// optional `.env` file in the working directory.
    #[arg(short = 'f', long = "file", global = true)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the Tributary server
    Run(RunCommand),

    /// Load, chunk, embed and upsert the document directory
    Ingest(IngestCommand),

    /// Answer a single question and print the summary
    Ask(AskCommand),

    /// Generate shell completion scripts
    #[command(hide = true)]
    Completion(CompletionCommand),
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Configuration file, if one was given
    pub fn config_path(&self) -> Option<&str> {
        self.config.as_deref()
    }
}

/// Load settings from the given file or from the environment
pub(crate) fn load_settings(config_path: Option<&str>) -> Result<Settings, TributaryError> {
    match config_path {
        Some(path) => info!("Loading configuration from: {}", path),
        None => info!("Loading configuration from environment"),
    }
    tributary_parser::load(config_path)
}
