//! Root settings model

use serde::{Deserialize, Serialize};

use super::{DatabaseConfig, DocumentsConfig, IndexConfig, LlmConfig, OrchestratorConfig, ServerConfig};

fn default_name() -> String {
    "tributary".to_string()
}

/// Everything a Tributary process needs, loaded once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Deployment name, shown in logs
    #[serde(default = "default_name")]
    pub name: String,

    /// Language-model backend
    pub llm: LlmConfig,

    /// Vector index
    pub index: IndexConfig,

    /// Document corpus
    pub documents: DocumentsConfig,

    /// First relational branch (its results fill the first prompt slot)
    pub engine_a: DatabaseConfig,

    /// Second relational branch (its results fill the last prompt slot)
    pub engine_b: DatabaseConfig,

    /// Server configuration (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Fan-out configuration (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orchestrator: Option<OrchestratorConfig>,
}

impl Settings {
    /// Server configuration with defaults applied
    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    /// Fan-out configuration with defaults applied
    pub fn orchestrator(&self) -> OrchestratorConfig {
        self.orchestrator.clone().unwrap_or_default()
    }

    /// Get the server port, defaulting to 8008
    pub fn port(&self) -> u16 {
        self.server.as_ref().map(|s| s.port()).unwrap_or(8008)
    }

    /// Both relational branches, in prompt-slot order
    pub fn databases(&self) -> [&DatabaseConfig; 2] {
        [&self.engine_a, &self.engine_b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tributary_types::Engine;

    fn sample_settings() -> Settings {
        Settings {
            name: "test".to_string(),
            llm: LlmConfig::new("sk-test"),
            index: IndexConfig::new("pc-test", "docs"),
            documents: DocumentsConfig::new("data"),
            engine_a: DatabaseConfig::new("events", Engine::Postgres)
                .with_keywords(["event_amount", "event_expenses"]),
            engine_b: DatabaseConfig::new("crm", Engine::Mysql),
            server: None,
            orchestrator: None,
        }
    }

    #[test]
    fn test_default_port() {
        assert_eq!(sample_settings().port(), 8008);
    }

    #[test]
    fn test_custom_port() {
        let mut settings = sample_settings();
        settings.server = Some(ServerConfig {
            port: Some(3000),
            request_timeout_secs: None,
        });
        assert_eq!(settings.port(), 3000);
        assert_eq!(settings.server().request_timeout().as_secs(), 120);
    }

    #[test]
    fn test_databases_order() {
        let settings = sample_settings();
        let [a, b] = settings.databases();
        assert_eq!(a.name, "events");
        assert_eq!(b.name, "crm");
        assert!(!a.gate().is_open());
        assert!(b.gate().is_open());
    }
}
