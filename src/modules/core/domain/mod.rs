//! Domain models for Tributary

mod database;
mod gate;
mod schema;
mod settings;
mod types;

pub use database::{DatabaseConfig, IntrospectionPolicy};
pub use gate::KeywordGate;
pub use schema::{ForeignKey, SchemaDescription, TableSchema};
pub use settings::Settings;
pub use types::{DocumentsConfig, IndexConfig, LlmConfig, OrchestratorConfig, ServerConfig};
