//! Language-model trait definitions

use async_trait::async_trait;
use tributary_core::TributaryError;

/// Turns a prompt into a completion
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a single-turn prompt and return the raw text
    async fn complete(&self, prompt: &str) -> Result<String, TributaryError>;

    /// Model identifier, for logs
    fn model_name(&self) -> &str;
}

/// Turns text into vectors of the index dimension
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input, in input order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, TributaryError>;

    /// Embed a single query text
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, TributaryError> {
        self.embed(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| TributaryError::Retrieval("Embedding response was empty".to_string()))
    }
}
