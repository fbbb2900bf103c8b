//! HTTP server for Tributary

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tributary_core::{Settings, TributaryError};
use tracing::{debug, info, warn};

use crate::connectors::EngineSet;
use crate::executor::SqlSynthesizer;
use crate::handlers::{HealthHandler, IndexHandler, QueryHandler};
use crate::llm::OpenAiClient;
use crate::orchestrator::Orchestrator;
use crate::retrieval::{IngestReport, Ingestor, PineconeIndex, SemanticRetriever, VectorIndex};
use crate::state::AppState;

/// Build the Axum router
///
/// `/query` enforces the request timeout itself so that expiry still answers
/// with a JSON error body; the remaining routes use the plain timeout layer.
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let pages = Router::new()
        .route("/", get(IndexHandler::handle))
        .route("/health", get(HealthHandler::check))
        .route("/health/backends", get(HealthHandler::backends))
        .layer(TimeoutLayer::new(state.request_timeout));

    Router::new()
        .route("/query", post(QueryHandler::execute))
        .merge(pages)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Runtime server for Tributary
///
/// Every process-wide client is built once here and shared by reference.
pub struct Runtime {
    settings: Arc<Settings>,
    engines: Arc<EngineSet>,
    orchestrator: Arc<Orchestrator>,
    ingestor: Arc<Ingestor>,
    port_override: Option<u16>,
}

impl Runtime {
    /// Create a new runtime from settings
    pub fn new(settings: Settings) -> Result<Self, TributaryError> {
        Self::with_port_override(settings, None)
    }

    /// Create a new runtime with an optional port override
    pub fn with_port_override(
        settings: Settings,
        port_override: Option<u16>,
    ) -> Result<Self, TributaryError> {
        let llm = Arc::new(OpenAiClient::new(&settings.llm));
        let index: Arc<dyn VectorIndex> = Arc::new(PineconeIndex::new(&settings.index));
        let engines = Arc::new(EngineSet::from_settings(&settings));

        let engine_a = SqlSynthesizer::from_config(
            &settings.engine_a,
            engines.get(&settings.engine_a.name)?,
            llm.clone(),
        );
        let engine_b = SqlSynthesizer::from_config(
            &settings.engine_b,
            engines.get(&settings.engine_b.name)?,
            llm.clone(),
        );
        let retriever = Arc::new(SemanticRetriever::new(
            llm.clone(),
            index.clone(),
            settings.index.top_k,
        ));
        let orchestrator = Arc::new(
            Orchestrator::new(engine_a, engine_b, retriever, llm.clone())
                .with_branch_timeout(settings.orchestrator().branch_timeout()),
        );
        let ingestor = Arc::new(Ingestor::new(&settings.documents, llm, index)?);

        Ok(Self {
            settings: Arc::new(settings),
            engines,
            orchestrator,
            ingestor,
            port_override,
        })
    }

    /// Effective listening port
    pub fn port(&self) -> u16 {
        self.port_override.unwrap_or_else(|| self.settings.port())
    }

    /// Start the server
    pub async fn run(&self) -> Result<(), TributaryError> {
        if self.settings.documents.ingest_on_start {
            let report = self.ingest().await?;
            info!("Startup ingestion complete: {}", report);
        }

        let addr: SocketAddr = format!("0.0.0.0:{}", self.port())
            .parse()
            .map_err(|e| TributaryError::Server(format!("Invalid address: {}", e)))?;

        let state = AppState::new(
            self.orchestrator.clone(),
            self.engines.clone(),
            self.settings.server().request_timeout(),
        );
        let app = router(state);

        info!("Starting Tributary server on http://{}", addr);
        info!("Deployment: {}", self.settings.name);
        info!("Database branches: {}", self.engines.names().join(", "));
        info!("Vector index: {}", self.settings.index.name);
        info!("Language model: {}", self.settings.llm.model);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TributaryError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(Self::shutdown_signal())
            .await
            .map_err(|e| TributaryError::Server(format!("Server error: {}", e)))?;

        info!("Server stopped");
        Ok(())
    }

    /// Wait for shutdown signal
    async fn shutdown_signal() {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM signal handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                debug!("Received CTRL+C, shutting down...");
            }
            _ = terminate => {
                debug!("Received SIGTERM, shutting down...");
            }
        }
    }

    /// Load, embed and upsert the document directory
    pub async fn ingest(&self) -> Result<IngestReport, TributaryError> {
        info!("Ingesting documents from '{}'", self.settings.documents.directory);
        self.ingestor.ingest().await
    }

    /// Get the settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the orchestrator
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tributary_core::{DatabaseConfig, DocumentsConfig, IndexConfig, LlmConfig, ServerConfig};
    use tributary_types::Engine;

    fn create_test_settings() -> Settings {
        Settings {
            name: "test".to_string(),
            llm: LlmConfig::new("sk-test"),
            index: IndexConfig::new("pc-test", "docs"),
            documents: DocumentsConfig::new("data"),
            engine_a: DatabaseConfig::new("postgres", Engine::Postgres)
                .with_connection("localhost", "app", "", "events"),
            engine_b: DatabaseConfig::new("mysql", Engine::Mysql)
                .with_connection("localhost", "root", "", "crm"),
            server: None,
            orchestrator: None,
        }
    }

    #[test]
    fn test_runtime_creation() {
        let runtime = Runtime::new(create_test_settings()).unwrap();
        assert_eq!(runtime.port(), 8008);
        assert_eq!(runtime.settings().name, "test");
    }

    #[test]
    fn test_runtime_with_port_override() {
        let mut settings = create_test_settings();
        settings.server = Some(ServerConfig {
            port: Some(8080),
            request_timeout_secs: None,
        });
        let runtime = Runtime::with_port_override(settings.clone(), Some(3000)).unwrap();
        assert_eq!(runtime.port(), 3000);

        let runtime = Runtime::new(settings).unwrap();
        assert_eq!(runtime.port(), 8080);
    }

    #[test]
    fn test_runtime_rejects_bad_chunking() {
        let mut settings = create_test_settings();
        settings.documents.chunk_overlap = settings.documents.chunk_size;
        assert!(matches!(
            Runtime::new(settings),
            Err(TributaryError::Config(_))
        ));
    }
}
