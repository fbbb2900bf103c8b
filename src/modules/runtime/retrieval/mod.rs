//! Document ingestion and semantic retrieval

mod ingest;
mod loader;
mod pinecone;
mod semantic;
mod splitter;
mod traits;

pub use ingest::{IngestReport, Ingestor};
pub use loader::DocumentLoader;
pub use pinecone::PineconeIndex;
pub use semantic::SemanticRetriever;
pub use splitter::{Chunk, RecursiveCharacterSplitter};
pub use traits::{IndexMatch, Retriever, VectorIndex, VectorRecord};
