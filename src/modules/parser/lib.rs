//! Configuration loading for Tributary
//!
//! Settings come either from a YAML file with `{{ env.VAR }}` placeholders or
//! straight from environment variables. Both paths end in the same validation.

pub mod env;
pub mod environment;
pub mod validator;
pub mod yaml;

pub use environment::EnvLoader;
pub use validator::ConfigValidator;
pub use yaml::YamlParser;

use tributary_core::{Settings, TributaryError};

/// Parse a configuration file from a path
pub fn parse_file(path: &str) -> Result<Settings, TributaryError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| TributaryError::Config(format!("Failed to read file '{}': {}", path, e)))?;

    parse_string(&content)
}

/// Parse a configuration from a string
pub fn parse_string(content: &str) -> Result<Settings, TributaryError> {
    let settings = YamlParser::parse(content)?;
    ConfigValidator::new().validate(&settings)?;
    Ok(settings)
}

/// Build settings from the process environment
pub fn from_env() -> Result<Settings, TributaryError> {
    let settings = EnvLoader::new().load()?;
    ConfigValidator::new().validate(&settings)?;
    Ok(settings)
}

/// Load from a file when one is given, otherwise from the environment
pub fn load(path: Option<&str>) -> Result<Settings, TributaryError> {
    match path {
        Some(path) => parse_file(path),
        None => from_env(),
    }
}
