//! HTTP request handlers for the Tributary server
//!
//! This module contains handlers for question answering, the landing page,
//! and health checks.

mod health;
mod index;
mod query;

pub use health::HealthHandler;
pub use index::IndexHandler;
pub use query::QueryHandler;
