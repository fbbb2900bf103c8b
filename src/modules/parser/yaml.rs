//! YAML configuration parser

use tributary_core::{Settings, TributaryError};

use crate::env::EnvSubstitutor;

/// YAML parser for Tributary configuration files
pub struct YamlParser;

impl YamlParser {
    /// Parse a YAML string into settings, substituting `{{ env.* }}` placeholders first
    pub fn parse(content: &str) -> Result<Settings, TributaryError> {
        Self::parse_with(content, &EnvSubstitutor::new())
    }

    /// Parse with a caller-supplied substitutor
    pub fn parse_with(
        content: &str,
        substitutor: &EnvSubstitutor,
    ) -> Result<Settings, TributaryError> {
        let substituted = substitutor.substitute(content)?;
        Self::parse_raw(&substituted)
    }

    /// Parse a YAML string without environment variable substitution
    pub fn parse_raw(content: &str) -> Result<Settings, TributaryError> {
        serde_yaml::from_str::<Settings>(content)
            .map_err(|e| TributaryError::Config(format!("YAML parse error: {}", e)))
    }
}
