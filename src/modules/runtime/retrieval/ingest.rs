//! Document ingestion into the vector index

use futures::stream::{self, StreamExt, TryStreamExt};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tributary_core::{DocumentsConfig, TributaryError};
use tracing::{info, warn};

use super::loader::DocumentLoader;
use super::splitter::{Chunk, RecursiveCharacterSplitter};
use super::traits::{VectorIndex, VectorRecord};
use crate::llm::Embedder;

/// Embedding requests in flight at once
const EMBED_CONCURRENCY: usize = 4;

/// Outcome of one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
    pub upserted: usize,
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} documents, {} chunks, {} vectors upserted",
            self.documents, self.chunks, self.upserted
        )
    }
}

/// Loads, splits, embeds and upserts the document directory
pub struct Ingestor {
    loader: DocumentLoader,
    splitter: RecursiveCharacterSplitter,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    batch_size: usize,
}

impl Ingestor {
    pub fn new(
        config: &DocumentsConfig,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
    ) -> Result<Self, TributaryError> {
        Ok(Self {
            loader: DocumentLoader::new(&config.directory),
            splitter: RecursiveCharacterSplitter::new(config.chunk_size, config.chunk_overlap)?,
            embedder,
            index,
            batch_size: config.batch_size.max(1),
        })
    }

    /// Ingest every document; re-running overwrites vectors with the same ids
    pub async fn ingest(&self) -> Result<IngestReport, TributaryError> {
        let loader = self.loader.clone();
        let splitter = self.splitter.clone();
        let (documents, chunks) = tokio::task::spawn_blocking(move || {
            let documents = loader.load()?;
            let chunks = splitter.split_documents(&documents);
            Ok::<_, TributaryError>((documents.len(), chunks))
        })
        .await
        .map_err(|e| TributaryError::Internal(format!("Document loading task failed: {}", e)))??;

        let mut report = IngestReport {
            documents,
            chunks: chunks.len(),
            upserted: 0,
        };
        if chunks.is_empty() {
            warn!("No documents found in '{}'", self.loader.root().display());
            return Ok(report);
        }

        self.index.ensure_ready().await?;

        let batches: Vec<Vec<VectorRecord>> = stream::iter(chunks.chunks(self.batch_size))
            .map(|batch| self.embed_batch(batch))
            .buffered(EMBED_CONCURRENCY)
            .try_collect()
            .await?;

        for records in batches {
            report.upserted += self.index.upsert(records).await?;
        }

        info!("Ingested {}", report);
        Ok(report)
    }

    async fn embed_batch(&self, batch: &[Chunk]) -> Result<Vec<VectorRecord>, TributaryError> {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed(&texts).await?;

        Ok(batch
            .iter()
            .zip(vectors)
            .map(|(chunk, values)| VectorRecord {
                id: chunk_id(self.loader.root(), chunk),
                values,
                text: chunk.text.clone(),
                filename: chunk.filename.clone(),
            })
            .collect())
    }
}

/// `<path relative to the document root>#<ordinal>`, with `/` separators
fn chunk_id(root: &Path, chunk: &Chunk) -> String {
    let relative = match Path::new(&chunk.source).strip_prefix(root) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => chunk.source.clone(),
    };
    format!("{}#{}", relative, chunk.ordinal)
}
