//! Embedding-based passage retrieval

use async_trait::async_trait;
use std::sync::Arc;
use tributary_core::TributaryError;
use tributary_types::RetrievedPassage;
use tracing::debug;

use super::traits::{Retriever, VectorIndex};
use crate::llm::Embedder;

/// Embeds the question and returns the index's top matches
pub struct SemanticRetriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl SemanticRetriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>, top_k: usize) -> Self {
        Self {
            embedder,
            index,
            top_k,
        }
    }
}

#[async_trait]
impl Retriever for SemanticRetriever {
    async fn retrieve(&self, user_query: &str) -> Result<Vec<RetrievedPassage>, TributaryError> {
        self.index.ensure_ready().await?;

        let vector = self.embedder.embed_query(user_query).await?;
        let matches = self.index.query(vector, self.top_k).await?;
        debug!("Retrieved {} passages", matches.len());

        Ok(matches.into_iter().map(RetrievedPassage::from).collect())
    }
}
