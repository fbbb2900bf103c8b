//! Environment variable substitution for configuration files

use once_cell::sync::Lazy;
use regex::Regex;
use tributary_core::TributaryError;

/// Placeholder pattern: `{{ env.VAR_NAME }}` or `{{ env.VAR_NAME:-fallback }}`
static ENV_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*env\.([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*?))?\s*\}\}").unwrap()
});

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Environment variable substitutor
pub struct EnvSubstitutor {
    lookup: Lookup,
}

impl EnvSubstitutor {
    /// Substitutor reading the process environment (after loading `.env`)
    pub fn new() -> Self {
        let _ = dotenvy::dotenv();
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Substitutor with a custom variable source
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    /// Replace every placeholder; all unresolved names are reported together
    pub fn substitute(&self, content: &str) -> Result<String, TributaryError> {
        let mut missing: Vec<String> = Vec::new();

        let result = ENV_PATTERN.replace_all(content, |cap: &regex::Captures<'_>| {
            let name = &cap[1];
            match ((self.lookup)(name), cap.get(2)) {
                (Some(value), _) => value,
                (None, Some(fallback)) => fallback.as_str().trim().to_string(),
                (None, None) => {
                    if !missing.iter().any(|m| m == name) {
                        missing.push(name.to_string());
                    }
                    String::new()
                }
            }
        });

        if !missing.is_empty() {
            return Err(TributaryError::EnvVarNotFound(missing.join(", ")));
        }

        Ok(result.into_owned())
    }

    /// Check if a string contains environment variable placeholders
    pub fn has_placeholders(content: &str) -> bool {
        ENV_PATTERN.is_match(content)
    }
}

impl Default for EnvSubstitutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn substitutor(vars: &[(&str, &str)]) -> EnvSubstitutor {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvSubstitutor::with_lookup(move |name| vars.get(name).cloned())
    }

    #[test]
    fn test_has_placeholders() {
        assert!(EnvSubstitutor::has_placeholders("{{ env.OPENAI_API_KEY }}"));
        assert!(EnvSubstitutor::has_placeholders("{{env.PORT:-8008}}"));
        assert!(!EnvSubstitutor::has_placeholders("no placeholders"));
        assert!(!EnvSubstitutor::has_placeholders("{schema_info}"));
    }

    #[test]
    fn test_substitute_with_value() {
        let result = substitutor(&[("MYSQL_HOST", "db.internal")])
            .substitute("host: {{ env.MYSQL_HOST }}")
            .unwrap();
        assert_eq!(result, "host: db.internal");
    }

    #[test]
    fn test_substitute_fallback() {
        let result = substitutor(&[])
            .substitute("port: {{ env.PORT:-8008 }}")
            .unwrap();
        assert_eq!(result, "port: 8008");

        let result = substitutor(&[("PORT", "9000")])
            .substitute("port: {{ env.PORT:-8008 }}")
            .unwrap();
        assert_eq!(result, "port: 9000");
    }

    #[test]
    fn test_missing_vars_reported_together() {
        let err = substitutor(&[])
            .substitute("{{ env.A_KEY }} {{ env.B_KEY }} {{ env.A_KEY }}")
            .unwrap_err();
        match err {
            TributaryError::EnvVarNotFound(names) => assert_eq!(names, "A_KEY, B_KEY"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
