//! Run command implementation

use clap::Args;
use tributary_core::TributaryError;
use tributary_runtime::Runtime;

use super::load_settings;

/// Run command arguments
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Override server port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl RunCommand {
    /// Execute the run command
    pub async fn execute(&self, config_path: Option<&str>) -> Result<(), TributaryError> {
        let settings = load_settings(config_path)?;

        // Port override is handled by the runtime
        let runtime = Runtime::with_port_override(settings, self.port)?;
        runtime.run().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command_args() {
        let cmd = RunCommand { port: Some(8080) };
        assert_eq!(cmd.port, Some(8080));
    }
}
