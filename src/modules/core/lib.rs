//! Core domain logic for Tributary
//!
//! This crate contains the configuration model, schema descriptions, branch
//! gates, and the error type shared by every Tributary crate.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::{Result, TributaryError};
