//! Type definitions for Tributary
//!
//! This crate contains shared type definitions used across the Tributary codebase,
//! including relational engine kinds, result rows, documents, and HTTP wire types.

pub mod document;
pub mod engine;
pub mod row;
pub mod runtime;

pub use document::{filename_of, render_passages, Document, RetrievedPassage};
pub use engine::Engine;
pub use row::{render_rows, ResultSet, Row};
