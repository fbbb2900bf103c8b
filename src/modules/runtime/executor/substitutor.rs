//! Placeholder substitution for prompt templates

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeSet;
use tributary_core::TributaryError;

/// Regex pattern for template placeholders: {variable_name}
static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_][a-z0-9_]*)\}").unwrap());

/// A prompt with `{name}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Placeholder names used by the template
    pub fn variables(&self) -> BTreeSet<&str> {
        PLACEHOLDER_PATTERN
            .captures_iter(&self.template)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Substitute every placeholder in one pass
    ///
    /// Substituted values are never re-scanned, so braces inside schema text or
    /// JSON results are left alone. Every placeholder must have a value.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String, TributaryError> {
        let missing: Vec<&str> = self
            .variables()
            .into_iter()
            .filter(|name| !values.iter().any(|(key, _)| key == name))
            .collect();
        if !missing.is_empty() {
            return Err(TributaryError::Template(format!(
                "No value for placeholder(s): {}",
                missing.join(", ")
            )));
        }

        let rendered = PLACEHOLDER_PATTERN.replace_all(&self.template, |cap: &Captures| {
            let name = &cap[1];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_default()
        });

        Ok(rendered.into_owned())
    }
}
