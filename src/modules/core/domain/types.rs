//! Additional configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on (default: 8008)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Whole-request timeout in seconds (default: 120)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: Some(8008),
            request_timeout_secs: Some(120),
        }
    }
}

impl ServerConfig {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(8008)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(120))
    }
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

/// Language-model and embedding backend
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,

    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Chat model used for SQL synthesis and summarization
    #[serde(default = "default_chat_model")]
    pub model: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_llm_base_url(),
            model: default_chat_model(),
            embedding_model: default_embedding_model(),
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .finish()
    }
}

fn default_control_url() -> String {
    "https://api.pinecone.io".to_string()
}

fn default_dimension() -> usize {
    1536
}

fn default_metric() -> String {
    "cosine".to_string()
}

fn default_cloud() -> String {
    "aws".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_top_k() -> usize {
    4
}

fn default_ready_timeout_secs() -> u64 {
    60
}

/// Vector index configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    pub api_key: String,

    /// Index name
    pub name: String,

    /// Control-plane base URL
    #[serde(default = "default_control_url")]
    pub control_url: String,

    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Similarity metric used when the index is created
    #[serde(default = "default_metric")]
    pub metric: String,

    #[serde(default = "default_cloud")]
    pub cloud: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Passages returned per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Upper bound on waiting for a freshly created index to report ready
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl IndexConfig {
    pub fn new(api_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            name: name.into(),
            control_url: default_control_url(),
            dimension: default_dimension(),
            metric: default_metric(),
            cloud: default_cloud(),
            region: default_region(),
            top_k: default_top_k(),
            ready_timeout_secs: default_ready_timeout_secs(),
            namespace: None,
        }
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }
}

impl std::fmt::Debug for IndexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexConfig")
            .field("api_key", &"***")
            .field("name", &self.name)
            .field("control_url", &self.control_url)
            .field("dimension", &self.dimension)
            .field("metric", &self.metric)
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}

fn default_chunk_size() -> usize {
    1000
}

fn default_batch_size() -> usize {
    64
}

/// Document corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Directory scanned for PDF and CSV files
    pub directory: String,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default)]
    pub chunk_overlap: usize,

    /// Chunks embedded per request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Run ingestion when the server starts
    #[serde(default)]
    pub ingest_on_start: bool,
}

impl DocumentsConfig {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            chunk_size: default_chunk_size(),
            chunk_overlap: 0,
            batch_size: default_batch_size(),
            ingest_on_start: false,
        }
    }
}

/// Fan-out settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Per-branch timeout in seconds; 0 disables it (default: 60)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_timeout_secs: Option<u64>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            branch_timeout_secs: Some(60),
        }
    }
}

impl OrchestratorConfig {
    pub fn branch_timeout(&self) -> Option<Duration> {
        match self.branch_timeout_secs.unwrap_or(60) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port(), 8008);
        assert_eq!(config.request_timeout().as_secs(), 120);
    }

    #[test]
    fn test_index_config_defaults_from_json() {
        let config: IndexConfig =
            serde_json::from_str(r#"{"api_key":"k","name":"docs"}"#).unwrap();
        assert_eq!(config.dimension, 1536);
        assert_eq!(config.metric, "cosine");
        assert_eq!(config.top_k, 4);
        assert_eq!(config.ready_timeout().as_secs(), 60);
        assert!(!format!("{:?}", config).contains("\"k\""));
    }

    #[test]
    fn test_documents_config_defaults() {
        let config: DocumentsConfig = serde_json::from_str(r#"{"directory":"data"}"#).unwrap();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 0);
        assert_eq!(config.batch_size, 64);
        assert!(!config.ingest_on_start);
    }

    #[test]
    fn test_branch_timeout() {
        assert_eq!(
            OrchestratorConfig::default().branch_timeout(),
            Some(Duration::from_secs(60))
        );
        let disabled = OrchestratorConfig {
            branch_timeout_secs: Some(0),
        };
        assert_eq!(disabled.branch_timeout(), None);
    }
}
