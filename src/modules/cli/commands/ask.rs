//! Ask command implementation

use clap::Args;
use tributary_core::TributaryError;
use tributary_runtime::Runtime;
use tracing::debug;

use super::load_settings;

/// Ask command arguments
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer
    pub prompt: String,

    /// Print the answer and per-branch counts as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command
    pub async fn execute(&self, config_path: Option<&str>) -> Result<(), TributaryError> {
        let settings = load_settings(config_path)?;
        let runtime = Runtime::new(settings)?;

        let answer = runtime.orchestrator().answer(&self.prompt).await?;
        debug!(
            "Branches returned {} + {} rows and {} passages",
            answer.engine_a_rows, answer.engine_b_rows, answer.passages
        );

        if self.json {
            let output = serde_json::json!({
                "result": answer.text,
                "engine_a_rows": answer.engine_a_rows,
                "passages": answer.passages,
                "engine_b_rows": answer.engine_b_rows,
            });
            let rendered = serde_json::to_string_pretty(&output)
                .map_err(|e| TributaryError::Internal(format!("Failed to render answer: {}", e)))?;
            println!("{}", rendered);
        } else {
            println!("{}", answer.text);
        }

        Ok(())
    }
}
