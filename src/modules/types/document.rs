//! Source documents and retrieved passages

use serde::{Deserialize, Serialize};

/// A loaded source document, before chunking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Extracted text content
    pub content: String,
    /// Full path of the originating file
    pub source: String,
    /// Final path component of `source`
    pub filename: String,
    /// Zero-based row number for tabular sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl Document {
    /// Create a document, deriving the filename from the source path
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let filename = filename_of(&source);
        Self {
            content: content.into(),
            source,
            filename,
            row: None,
        }
    }

    /// Attach a row number
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

/// Final component of a path, accepting both `/` and `\` separators
pub fn filename_of(source: &str) -> String {
    source
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source)
        .to_string()
}

/// A chunk of text returned by the semantic retriever
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Passage text
    pub text: String,
    /// Originating file name
    pub filename: String,
    /// Similarity score reported by the index
    #[serde(default)]
    pub score: f32,
}

impl RetrievedPassage {
    pub fn new(text: impl Into<String>, filename: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            filename: filename.into(),
            score,
        }
    }
}

/// Render passages for inclusion in a prompt
pub fn render_passages(passages: &[RetrievedPassage]) -> String {
    if passages.is_empty() {
        return "[]".to_string();
    }
    passages
        .iter()
        .map(|p| format!("- [{}] {}", p.filename, p.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_of() {
        assert_eq!(filename_of("data/reports/q1.pdf"), "q1.pdf");
        assert_eq!(filename_of("C:\\data\\events.csv"), "events.csv");
        assert_eq!(filename_of("plain.csv"), "plain.csv");
    }

    #[test]
    fn test_document_new() {
        let doc = Document::new("hello", "docs/a.pdf").with_row(3);
        assert_eq!(doc.filename, "a.pdf");
        assert_eq!(doc.row, Some(3));
    }

    #[test]
    fn test_render_passages() {
        let passages = vec![
            RetrievedPassage::new("Budget was raised.\n", "plan.pdf", 0.9),
            RetrievedPassage::new("venue: Hall B", "events.csv", 0.8),
        ];
        assert_eq!(
            render_passages(&passages),
            "- [plan.pdf] Budget was raised.\n- [events.csv] venue: Hall B"
        );
        assert_eq!(render_passages(&[]), "[]");
    }
}
