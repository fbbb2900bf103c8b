//! Retrieval trait definitions

use async_trait::async_trait;
use tributary_core::TributaryError;
use tributary_types::RetrievedPassage;

/// A vector with the metadata stored next to it
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    /// Deterministic id, `<relative path>#<chunk index>`
    pub id: String,
    pub values: Vec<f32>,
    pub text: String,
    pub filename: String,
}

/// One similarity-search hit
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMatch {
    pub id: String,
    pub score: f32,
    pub text: String,
    pub filename: String,
}

impl From<IndexMatch> for RetrievedPassage {
    fn from(m: IndexMatch) -> Self {
        RetrievedPassage::new(m.text, m.filename, m.score)
    }
}

/// Storage and similarity search for embedded chunks
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the index if absent and wait until it accepts traffic
    async fn ensure_ready(&self) -> Result<(), TributaryError>;

    /// Insert or overwrite records, returning how many were written
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, TributaryError>;

    /// Nearest neighbours of `vector`, best first
    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<IndexMatch>, TributaryError>;
}

/// Question to passages
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, user_query: &str) -> Result<Vec<RetrievedPassage>, TributaryError>;
}
