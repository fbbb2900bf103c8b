//! PDF and CSV document loading

use std::path::{Path, PathBuf};
use tributary_core::TributaryError;
use tributary_types::Document;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Loads every `*.pdf` and `*.csv` file below a directory
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    root: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Pdf,
    Csv,
}

impl DocumentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load all documents; PDFs first, then CSVs, each in path order
    pub fn load(&self) -> Result<Vec<Document>, TributaryError> {
        if !self.root.is_dir() {
            return Err(TributaryError::Retrieval(format!(
                "Document directory '{}' does not exist",
                self.root.display()
            )));
        }

        let mut pdfs = Vec::new();
        let mut csvs = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                TributaryError::Retrieval(format!("Failed to walk document directory: {}", e))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            match Self::kind(entry.path()) {
                Some(Kind::Pdf) => pdfs.push(entry.into_path()),
                Some(Kind::Csv) => csvs.push(entry.into_path()),
                None => {}
            }
        }

        let mut documents = Vec::new();
        for path in &pdfs {
            documents.extend(Self::load_pdf(path)?);
        }
        for path in &csvs {
            documents.extend(Self::load_csv(path)?);
        }

        debug!(
            "Loaded {} documents from {} PDF and {} CSV files",
            documents.len(),
            pdfs.len(),
            csvs.len()
        );
        Ok(documents)
    }

    fn kind(path: &Path) -> Option<Kind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Kind::Pdf),
            "csv" => Some(Kind::Csv),
            _ => None,
        }
    }

    fn load_pdf(path: &Path) -> Result<Option<Document>, TributaryError> {
        let text = pdf_extract::extract_text(path).map_err(|e| {
            TributaryError::Retrieval(format!("Failed to read PDF '{}': {}", path.display(), e))
        })?;

        if text.trim().is_empty() {
            warn!("PDF '{}' has no extractable text", path.display());
            return Ok(None);
        }
        Ok(Some(Document::new(text, path.to_string_lossy())))
    }

    /// One document per data row, as `header: value` lines
    fn load_csv(path: &Path) -> Result<Vec<Document>, TributaryError> {
        let csv_error = |e: csv::Error| {
            TributaryError::Retrieval(format!("Failed to read CSV '{}': {}", path.display(), e))
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(csv_error)?;
        let headers = reader.headers().map_err(csv_error)?.clone();
        let source = path.to_string_lossy().to_string();

        let mut documents = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(csv_error)?;
            let content = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| format!("{}: {}", header.trim(), value.trim()))
                .collect::<Vec<_>>()
                .join("\n");
            documents.push(Document::new(content, source.clone()).with_row(row));
        }

        Ok(documents)
    }
}
