//! Tributary CLI
//!
//! This crate provides the command-line interface for Tributary including:
//! - run: Start the HTTP server
//! - ingest: Load the document directory into the vector index
//! - ask: Answer a single question and print the summary

pub mod commands;

pub use commands::{Cli, Commands};
