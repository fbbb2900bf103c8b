//! Engine registry for the relational branches

use std::collections::BTreeMap;
use std::sync::Arc;
use tributary_core::{DatabaseConfig, Settings, TributaryError};
use tributary_types::Engine;

use super::mysql::MySqlEngine;
use super::postgres::PostgresEngine;
use super::traits::SqlEngine;

/// Engines keyed by branch name, in prompt-slot order
pub struct EngineSet {
    engines: Vec<(String, Arc<dyn SqlEngine>)>,
}

impl EngineSet {
    /// Build one engine per configured relational branch
    pub fn from_settings(settings: &Settings) -> Self {
        let engines = settings
            .databases()
            .into_iter()
            .map(|config| (config.name.clone(), Self::create_engine(config)))
            .collect();

        Self { engines }
    }

    /// Build a set from already constructed engines
    pub fn from_engines(engines: Vec<(String, Arc<dyn SqlEngine>)>) -> Self {
        Self { engines }
    }

    /// Create a single engine based on branch configuration
    pub fn create_engine(config: &DatabaseConfig) -> Arc<dyn SqlEngine> {
        match config.engine {
            Engine::Postgres => Arc::new(PostgresEngine::new(config)),
            Engine::Mysql => Arc::new(MySqlEngine::new(config)),
        }
    }

    /// Get an engine by branch name
    pub fn get(&self, name: &str) -> Result<Arc<dyn SqlEngine>, TributaryError> {
        self.engines
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, engine)| engine.clone())
            .ok_or_else(|| TributaryError::Config(format!("Unknown database branch '{}'", name)))
    }

    /// Branch names, in prompt-slot order
    pub fn names(&self) -> Vec<String> {
        self.engines.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Run health checks on all engines in parallel
    pub async fn health_check_all(&self) -> BTreeMap<String, Result<(), String>> {
        let checks = self.engines.iter().map(|(name, engine)| {
            let name = name.clone();
            let engine = Arc::clone(engine);
            async move {
                let result = engine.health_check().await.map_err(|e| e.sanitized_message());
                (name, result)
            }
        });

        futures::future::join_all(checks).await.into_iter().collect()
    }
}
