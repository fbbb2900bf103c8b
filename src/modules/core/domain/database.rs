//! Relational database branch configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use tributary_types::Engine;

use super::KeywordGate;

/// What a SQL branch does when schema introspection fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntrospectionPolicy {
    /// Log the failure and continue with an empty schema
    #[default]
    Degrade,
    /// Fail the branch
    Fail,
}

/// Connection and gating configuration for one relational branch
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Branch name, used in logs and error messages
    pub name: String,

    /// Relational engine
    pub engine: Engine,

    pub host: String,

    /// TCP port (engine default when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    pub user: String,

    #[serde(default)]
    pub password: String,

    pub database: String,

    /// Trigger substrings; when non-empty the branch only runs for matching questions
    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub introspection: IntrospectionPolicy,
}

impl DatabaseConfig {
    /// Create a configuration with empty connection parameters
    pub fn new(name: impl Into<String>, engine: Engine) -> Self {
        Self {
            name: name.into(),
            engine,
            host: String::new(),
            port: None,
            user: String::new(),
            password: String::new(),
            database: String::new(),
            keywords: Vec::new(),
            introspection: IntrospectionPolicy::default(),
        }
    }

    /// Set host, user, password and database in one go
    pub fn with_connection(
        mut self,
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        self.host = host.into();
        self.user = user.into();
        self.password = password.into();
        self.database = database.into();
        self
    }

    /// Set the gate keywords
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Effective port
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.engine.default_port())
    }

    /// Gate built from the configured keywords
    pub fn gate(&self) -> KeywordGate {
        KeywordGate::new(self.keywords.iter().cloned())
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("name", &self.name)
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port())
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("keywords", &self.keywords)
            .field("introspection", &self.introspection)
            .finish()
    }
}
