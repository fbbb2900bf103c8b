//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Map, Value};

use crate::state::AppState;

/// Handler for liveness and backend checks
pub struct HealthHandler;

impl HealthHandler {
    /// Handle GET /health
    pub async fn check() -> &'static str {
        "OK"
    }

    /// Handle GET /health/backends: one connection attempt per relational branch
    pub async fn backends(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
        let report = state.engines.health_check_all().await;
        let healthy = report.values().all(Result::is_ok);

        let branches: Map<String, Value> = report
            .into_iter()
            .map(|(name, result)| {
                let status = match result {
                    Ok(()) => json!({ "status": "ok" }),
                    Err(error) => json!({ "status": "error", "error": error }),
                };
                (name, status)
            })
            .collect();

        let status = if healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (status, Json(json!({ "healthy": healthy, "branches": branches })))
    }
}
