//! Relational engine type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported relational engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// PostgreSQL database
    Postgres,
    /// MySQL database
    Mysql,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Postgres => write!(f, "postgres"),
            Engine::Mysql => write!(f, "mysql"),
        }
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Engine::Postgres),
            "mysql" | "mariadb" => Ok(Engine::Mysql),
            _ => Err(format!("Unknown engine type: {}", s)),
        }
    }
}

impl Engine {
    /// Returns all supported engines
    pub fn all() -> &'static [Engine] {
        &[Engine::Postgres, Engine::Mysql]
    }

    /// Human-readable product name, used in prompts and log lines
    pub fn label(&self) -> &'static str {
        match self {
            Engine::Postgres => "PostgreSQL",
            Engine::Mysql => "MySQL",
        }
    }

    /// Default TCP port for the engine
    pub fn default_port(&self) -> u16 {
        match self {
            Engine::Postgres => 5432,
            Engine::Mysql => 3306,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_from_str() {
        assert_eq!(Engine::from_str("postgres").unwrap(), Engine::Postgres);
        assert_eq!(Engine::from_str("PostgreSQL").unwrap(), Engine::Postgres);
        assert_eq!(Engine::from_str("mysql").unwrap(), Engine::Mysql);
        assert_eq!(Engine::from_str("mariadb").unwrap(), Engine::Mysql);
        assert!(Engine::from_str("redis").is_err());
    }

    #[test]
    fn test_engine_display() {
        assert_eq!(Engine::Postgres.to_string(), "postgres");
        assert_eq!(Engine::Mysql.to_string(), "mysql");
        assert_eq!(Engine::Postgres.label(), "PostgreSQL");
    }

    #[test]
    fn test_engine_serde() {
        let json = serde_json::to_string(&Engine::Postgres).unwrap();
        assert_eq!(json, "\"postgres\"");

        let engine: Engine = serde_json::from_str("\"mysql\"").unwrap();
        assert_eq!(engine, Engine::Mysql);
    }
}
