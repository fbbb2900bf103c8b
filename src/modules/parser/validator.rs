//! Configuration validation

use once_cell::sync::Lazy;
use regex::Regex;
use tributary_core::{DatabaseConfig, Settings, TributaryError};

/// Regex pattern for valid branch names (lower-kebab-case or lower_snake_case)
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*(?:[-_][a-z0-9]+)*$").unwrap());

/// Vector index names: lowercase alphanumerics and hyphens
static INDEX_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$").unwrap());

const METRICS: &[&str] = &["cosine", "euclidean", "dotproduct"];

/// Configuration validator
pub struct ConfigValidator {
    /// Whether to validate names strictly
    strict_names: bool,
}

impl ConfigValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self { strict_names: true }
    }

    /// Create a validator with lenient name checking
    pub fn lenient() -> Self {
        Self {
            strict_names: false,
        }
    }

    /// Validate the settings, reporting every problem in a single error
    pub fn validate(&self, settings: &Settings) -> Result<(), TributaryError> {
        let mut problems = Vec::new();

        self.validate_llm(settings, &mut problems);
        self.validate_index(settings, &mut problems);
        self.validate_documents(settings, &mut problems);
        for db in settings.databases() {
            self.validate_database(db, &mut problems);
        }
        if settings.engine_a.name == settings.engine_b.name {
            problems.push(format!(
                "Duplicate database branch name: '{}'",
                settings.engine_a.name
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(TributaryError::Config(problems.join("; ")))
        }
    }

    fn validate_llm(&self, settings: &Settings, problems: &mut Vec<String>) {
        if settings.llm.api_key.is_empty() {
            problems.push("llm.api_key cannot be empty".to_string());
        }
        if settings.llm.model.is_empty() {
            problems.push("llm.model cannot be empty".to_string());
        }
        if !settings.llm.base_url.starts_with("http") {
            problems.push(format!(
                "llm.base_url must be an http(s) URL, got '{}'",
                settings.llm.base_url
            ));
        }
    }

    fn validate_index(&self, settings: &Settings, problems: &mut Vec<String>) {
        let index = &settings.index;
        if index.api_key.is_empty() {
            problems.push("index.api_key cannot be empty".to_string());
        }
        if !INDEX_NAME_PATTERN.is_match(&index.name) {
            problems.push(format!(
                "Invalid index name '{}': use lowercase letters, digits and hyphens",
                index.name
            ));
        }
        if index.dimension == 0 {
            problems.push("index.dimension must be positive".to_string());
        }
        if index.top_k == 0 {
            problems.push("index.top_k must be positive".to_string());
        }
        if !METRICS.contains(&index.metric.as_str()) {
            problems.push(format!(
                "Unknown index metric '{}': expected one of {}",
                index.metric,
                METRICS.join(", ")
            ));
        }
    }

    fn validate_documents(&self, settings: &Settings, problems: &mut Vec<String>) {
        let docs = &settings.documents;
        if docs.directory.is_empty() {
            problems.push("documents.directory cannot be empty".to_string());
        }
        if docs.chunk_size == 0 {
            problems.push("documents.chunk_size must be positive".to_string());
        } else if docs.chunk_overlap >= docs.chunk_size {
            problems.push(format!(
                "documents.chunk_overlap ({}) must be smaller than chunk_size ({})",
                docs.chunk_overlap, docs.chunk_size
            ));
        }
        if docs.batch_size == 0 {
            problems.push("documents.batch_size must be positive".to_string());
        }
    }

    fn validate_database(&self, db: &DatabaseConfig, problems: &mut Vec<String>) {
        if db.name.is_empty() {
            problems.push("Database branch name cannot be empty".to_string());
        } else if self.strict_names && !NAME_PATTERN.is_match(&db.name) {
            problems.push(format!(
                "Invalid branch name '{}': must be lower-kebab-case or lower_snake_case",
                db.name
            ));
        }

        for (field, value) in [("host", &db.host), ("user", &db.user), ("database", &db.database)] {
            if value.is_empty() {
                problems.push(format!("Database '{}' has an empty {}", db.name, field));
            }
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tributary_core::{DocumentsConfig, IndexConfig, LlmConfig};
    use tributary_types::Engine;

    fn valid_settings() -> Settings {
        Settings {
            name: "test".to_string(),
            llm: LlmConfig::new("sk"),
            index: IndexConfig::new("pc", "event-docs"),
            documents: DocumentsConfig::new("data"),
            engine_a: DatabaseConfig::new("events", Engine::Postgres)
                .with_connection("pg", "app", "", "events"),
            engine_b: DatabaseConfig::new("crm", Engine::Mysql)
                .with_connection("my", "root", "", "crm"),
            server: None,
            orchestrator: None,
        }
    }

    #[test]
    fn test_valid_settings() {
        assert!(ConfigValidator::new().validate(&valid_settings()).is_ok());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk() {
        let mut settings = valid_settings();
        settings.documents.chunk_overlap = 1000;
        let err = ConfigValidator::new().validate(&settings).unwrap_err();
        assert!(err.to_string().contains("chunk_overlap (1000)"));
    }

    #[test]
    fn test_duplicate_branch_names() {
        let mut settings = valid_settings();
        settings.engine_b.name = "events".to_string();
        let err = ConfigValidator::new().validate(&settings).unwrap_err();
        assert!(err.to_string().contains("Duplicate database branch name"));
    }

    #[test]
    fn test_problems_are_collected() {
        let mut settings = valid_settings();
        settings.index.name = "Event Docs".to_string();
        settings.index.metric = "manhattan".to_string();
        settings.engine_a.host.clear();
        let message = ConfigValidator::new()
            .validate(&settings)
            .unwrap_err()
            .to_string();
        assert!(message.contains("Invalid index name"));
        assert!(message.contains("Unknown index metric"));
        assert!(message.contains("Database 'events' has an empty host"));
    }

    #[test]
    fn test_lenient_names() {
        let mut settings = valid_settings();
        settings.engine_a.name = "Events DB".to_string();
        assert!(ConfigValidator::new().validate(&settings).is_err());
        assert!(ConfigValidator::lenient().validate(&settings).is_ok());
    }
}
