//! Engine trait definition

use async_trait::async_trait;
use tributary_core::{SchemaDescription, TributaryError};
use tributary_types::{Engine, ResultSet};

/// Trait for relational engines
///
/// Implementations own their connection parameters and open one connection
/// per call; the connection is closed before the call returns, whether it
/// succeeded or not.
#[async_trait]
pub trait SqlEngine: Send + Sync {
    /// Describe user tables of the default namespace
    async fn describe_schema(&self) -> Result<SchemaDescription, TributaryError>;

    /// Execute a statement and return one map per row
    async fn execute(&self, statement: &str) -> Result<ResultSet, TributaryError>;

    /// Check that a connection can be opened
    async fn health_check(&self) -> Result<(), TributaryError>;

    /// Engine kind
    fn engine(&self) -> Engine;
}
