//! Runtime for Tributary
//!
//! This crate provides the relational engines, the SQL synthesizers, document
//! ingestion and retrieval, the fan-out orchestrator, and the HTTP server.

pub mod connectors;
pub mod executor;
pub mod handlers;
pub mod llm;
pub mod orchestrator;
pub mod prompts;
pub mod retrieval;
pub mod server;
pub mod state;

#[cfg(test)]
mod mock;

pub use connectors::{EngineSet, SqlEngine};
pub use executor::SqlSynthesizer;
pub use handlers::{HealthHandler, IndexHandler, QueryHandler};
pub use llm::{Embedder, LanguageModel, OpenAiClient};
pub use orchestrator::{CompositeAnswer, Orchestrator};
pub use retrieval::{IngestReport, Ingestor, Retriever, VectorIndex};
pub use server::{router, Runtime};
