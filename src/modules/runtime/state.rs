//! Shared runtime application state (HTTP handlers)

use std::sync::Arc;
use std::time::Duration;

use crate::connectors::EngineSet;
use crate::orchestrator::Orchestrator;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub engines: Arc<EngineSet>,
    /// Upper bound on one request, summary call included
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        engines: Arc<EngineSet>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            orchestrator,
            engines,
            request_timeout,
        }
    }
}
