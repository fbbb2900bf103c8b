//! Recursive character text splitting

use std::collections::{HashMap, VecDeque};
use tributary_core::TributaryError;
use tributary_types::Document;

const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// A piece of a document, ready to embed
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub source: String,
    pub filename: String,
    /// Position among all chunks of the same source
    pub ordinal: usize,
}

/// Splits on the coarsest separator present, recursing into oversized pieces
///
/// Separators are kept at the start of the piece that follows them. Lengths are
/// counted in characters.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, TributaryError> {
        if chunk_size == 0 {
            return Err(TributaryError::Config("chunk_size must be positive".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(TributaryError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Split documents, numbering chunks per source
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut ordinals: HashMap<&str, usize> = HashMap::new();
        let mut chunks = Vec::new();

        for doc in documents {
            for text in self.split_text(&doc.content) {
                let ordinal = ordinals.entry(doc.source.as_str()).or_insert(0);
                chunks.push(Chunk {
                    text,
                    source: doc.source.clone(),
                    filename: doc.filename.clone(),
                    ordinal: *ordinal,
                });
                *ordinal += 1;
            }
        }

        chunks
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_with(text, &self.separators)
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut finer: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        for piece in Self::split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                pending.push(piece);
                continue;
            }
            if !pending.is_empty() {
                chunks.extend(self.merge(std::mem::take(&mut pending)));
            }
            if finer.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_with(&piece, finer));
            }
        }
        if !pending.is_empty() {
            chunks.extend(self.merge(pending));
        }

        chunks
    }

    fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
        if separator.is_empty() {
            return text.chars().map(String::from).collect();
        }

        let mut pieces = text.split(separator);
        let mut out: Vec<String> = pieces.next().map(String::from).into_iter().collect();
        out.extend(pieces.map(|p| format!("{}{}", separator, p)));
        out.retain(|p| !p.is_empty());
        out
    }

    /// Greedily pack small pieces into chunks, carrying up to `chunk_overlap`
    /// characters of trailing pieces into the next chunk
    fn merge(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: VecDeque<String> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(&piece);
            if total + len > self.chunk_size && !current.is_empty() {
                Self::push_joined(&mut chunks, &current);
                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    match current.pop_front() {
                        Some(front) => total -= char_len(&front),
                        None => break,
                    }
                }
            }
            total += len;
            current.push_back(piece);
        }
        Self::push_joined(&mut chunks, &current);

        chunks
    }

    fn push_joined(chunks: &mut Vec<String>, pieces: &VecDeque<String>) {
        let joined: String = pieces.iter().map(String::as_str).collect();
        let trimmed = joined.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
    }
}
