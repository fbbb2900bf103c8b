//! Ingest command implementation

use clap::Args;
use tributary_core::TributaryError;
use tributary_runtime::Runtime;
use tracing::info;

use super::load_settings;

/// Ingest command arguments
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Override the document directory from configuration
    #[arg(short, long)]
    pub directory: Option<String>,
}

impl IngestCommand {
    /// Execute the ingest command
    pub async fn execute(&self, config_path: Option<&str>) -> Result<(), TributaryError> {
        let mut settings = load_settings(config_path)?;
        if let Some(directory) = &self.directory {
            settings.documents.directory = directory.clone();
        }

        let runtime = Runtime::new(settings)?;
        let report = runtime.ingest().await?;
        info!("Ingestion complete");
        println!("{}", report);

        Ok(())
    }
}
