//! Runtime type definitions for request/response handling

use serde::{Deserialize, Serialize};

/// Question submitted to `POST /query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Free-text question
    #[serde(default)]
    pub prompt: String,
}

/// Successful answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Composite natural-language answer
    pub result: String,
    /// Wall-clock time spent on the request, in milliseconds
    pub processing_time_ms: f64,
}

impl QueryResponse {
    /// Create a response, rounding the elapsed time to two decimals
    pub fn new(result: impl Into<String>, elapsed: std::time::Duration) -> Self {
        let ms = elapsed.as_secs_f64() * 1000.0;
        Self {
            result: result.into(),
            processing_time_ms: (ms * 100.0).round() / 100.0,
        }
    }
}

/// Failure body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
