//! Read-only validation for synthesized SQL

use once_cell::sync::Lazy;
use regex::Regex;
use tributary_core::TributaryError;

/// A markdown code fence around the whole reply, with an optional language tag
static FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z]*\s*\n?(.*?)\s*```$").unwrap());

/// Accepts model output only when it is a single SELECT statement
pub struct ReadOnlyValidator;

impl ReadOnlyValidator {
    pub fn new() -> Self {
        Self
    }

    /// Trim, unwrap a code fence if present, and require a `select` prefix
    pub fn validate(&self, raw: &str) -> Result<String, TributaryError> {
        let trimmed = raw.trim();
        let statement = FENCE_PATTERN
            .captures(trimmed)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().trim())
            .unwrap_or(trimmed);

        if !statement.to_lowercase().starts_with("select") {
            return Err(TributaryError::Validation(format!(
                "The generated SQL query is not a SELECT query: {}",
                statement
            )));
        }

        Ok(statement.to_string())
    }
}

impl Default for ReadOnlyValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_accepted() {
        let v = ReadOnlyValidator::new();
        assert_eq!(
            v.validate("  \n\tSELECT * FROM events  \n").unwrap(),
            "SELECT * FROM events"
        );
        assert_eq!(v.validate("select 1").unwrap(), "select 1");
        assert_eq!(v.validate("SeLeCt 1").unwrap(), "SeLeCt 1");
    }

    #[test]
    fn test_code_fence_stripped() {
        let v = ReadOnlyValidator::new();
        let raw = "```sql\nSELECT SUM(event_amount) FROM events;\n```";
        assert_eq!(
            v.validate(raw).unwrap(),
            "SELECT SUM(event_amount) FROM events;"
        );
        assert_eq!(v.validate("```\nSELECT 1\n```").unwrap(), "SELECT 1");
    }

    #[test]
    fn test_non_select_rejected() {
        let v = ReadOnlyValidator::new();
        for raw in [
            "DELETE FROM events",
            "  drop table events",
            "WITH x AS (SELECT 1) SELECT * FROM x",
            "Here is your query: SELECT 1",
            "",
        ] {
            let err = v.validate(raw).unwrap_err();
            assert!(matches!(err, TributaryError::Validation(_)), "{raw}");
        }
    }
}
