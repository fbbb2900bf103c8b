//! Question answering handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::time::Instant;
use tributary_core::TributaryError;
use tributary_types::runtime::{ErrorResponse, QueryRequest, QueryResponse};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::state::AppState;

/// Handler for question answering requests
pub struct QueryHandler;

impl QueryHandler {
    /// Handle POST /query
    pub async fn execute(
        State(state): State<AppState>,
        payload: Result<Json<QueryRequest>, JsonRejection>,
    ) -> Response {
        let request_id = Uuid::new_v4();
        let span = info_span!("query", %request_id);

        async move {
            let started = Instant::now();

            let request = match payload {
                Ok(Json(request)) => request,
                Err(rejection) => {
                    warn!("Rejected request body: {}", rejection.body_text());
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse::new(rejection.body_text())),
                    )
                        .into_response();
                }
            };

            info!("Processing query: {}", request.prompt);

            let answer = tokio::time::timeout(
                state.request_timeout,
                state.orchestrator.answer(&request.prompt),
            )
            .await
            .unwrap_or_else(|_| {
                Err(TributaryError::Timeout {
                    millis: state.request_timeout.as_millis() as u64,
                })
            });

            match answer {
                Ok(answer) => {
                    let response = QueryResponse::new(answer.text, started.elapsed());
                    info!(
                        "Query answered in {} ms",
                        response.processing_time_ms
                    );
                    (StatusCode::OK, Json(response)).into_response()
                }
                Err(e) => {
                    if e.is_client_error() {
                        warn!("Query rejected: {}", e);
                    } else {
                        error!("Error in /query route: {}", e);
                    }
                    let status = StatusCode::from_u16(e.status_code())
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                    (status, Json(ErrorResponse::new(e.sanitized_message()))).into_response()
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::connectors::{EngineSet, SqlEngine};
    use crate::executor::SqlSynthesizer;
    use crate::mock::{ScriptedModel, StubEngine, StubRetriever};
    use crate::orchestrator::Orchestrator;
    use crate::server::router;
    use crate::state::AppState;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use tributary_core::{KeywordGate, TableSchema, SchemaDescription};
    use tributary_types::{Engine, RetrievedPassage};

    const SUMMARY: &str = "In total, events brought in 1500 this year.";

    fn app(engine_b: StubEngine) -> (Router, Arc<StubEngine>, Arc<ScriptedModel>) {
        let retriever = StubRetriever::new(vec![
            RetrievedPassage::new("Summit revenue was 1000", "q1.pdf", 0.9),
            RetrievedPassage::new("Meetup revenue was 500", "q2.pdf", 0.8),
        ]);
        app_with(engine_b, retriever, Duration::from_secs(5))
    }

    fn app_with(
        engine_b: StubEngine,
        retriever: StubRetriever,
        request_timeout: Duration,
    ) -> (Router, Arc<StubEngine>, Arc<ScriptedModel>) {
        let postgres = Arc::new(
            StubEngine::new(Engine::Postgres)
                .with_schema(SchemaDescription::from_tables(&[TableSchema::new("events")
                    .column("event_amount", "numeric")]))
                .with_rows(vec![json!({"sum": 1500}).as_object().cloned().unwrap()]),
        );
        let mysql = Arc::new(engine_b);
        let postgres_model = Arc::new(ScriptedModel::replying("SELECT SUM(event_amount) FROM events"));
        let mysql_model = Arc::new(ScriptedModel::replying("SELECT name FROM customers"));
        let summarizer = Arc::new(ScriptedModel::replying(SUMMARY));

        let engine_a = SqlSynthesizer::new("postgres", postgres.clone(), postgres_model)
            .with_gate(KeywordGate::new(["event_amount", "event_expenses"]));
        let engine_b = SqlSynthesizer::new("mysql", mysql.clone(), mysql_model);
        let retriever = Arc::new(retriever);

        let orchestrator = Arc::new(Orchestrator::new(
            engine_a,
            engine_b,
            retriever,
            summarizer.clone(),
        ));
        let engines: Vec<(String, Arc<dyn SqlEngine>)> = vec![
            ("postgres".to_string(), postgres.clone()),
            ("mysql".to_string(), mysql),
        ];
        let state = AppState::new(
            orchestrator,
            Arc::new(EngineSet::from_engines(engines)),
            request_timeout,
        );

        (router(state), postgres, summarizer)
    }

    fn post_query(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_query_end_to_end() {
        let (app, postgres, summarizer) = app(
            StubEngine::new(Engine::Mysql).with_rows(vec![json!({"name": "Acme"}).as_object().cloned().unwrap()]),
        );

        let response = app
            .oneshot(post_query(r#"{"prompt": "total event_amount this year"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["result"], SUMMARY);
        assert!(body["processing_time_ms"].as_f64().unwrap() >= 0.0);

        assert_eq!(postgres.describe_calls(), 1);
        assert_eq!(postgres.statements(), vec!["SELECT SUM(event_amount) FROM events"]);

        let prompt = &summarizer.prompts()[0];
        assert!(prompt.contains("\"sum\": 1500"));
        assert!(prompt.contains("- [q1.pdf] Summit revenue was 1000"));
        assert!(prompt.contains("- [q2.pdf] Meetup revenue was 500"));
        assert!(prompt.contains("\"name\": \"Acme\""));
    }

    #[tokio::test]
    async fn test_branch_failure_returns_500() {
        let (app, _, summarizer) =
            app(StubEngine::new(Engine::Mysql).with_execute_error("Table 'crm.customers' doesn't exist"));

        let response = app
            .oneshot(post_query(r#"{"prompt": "list customers"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("mysql branch failed"));
        assert!(error.contains("doesn't exist"));
        assert_eq!(summarizer.calls(), 0);
    }

    #[tokio::test]
    async fn test_connection_errors_are_redacted() {
        let (app, _, _) = app(
            StubEngine::new(Engine::Mysql).with_connection_error("mysql://root:secret@db:3306"),
        );

        let response = app
            .oneshot(post_query(r#"{"prompt": "list customers"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "mysql branch failed: Database connection error");
    }

    #[tokio::test]
    async fn test_empty_prompt_returns_400() {
        let (app, postgres, summarizer) = app(StubEngine::new(Engine::Mysql));

        let response = app.oneshot(post_query(r#"{"prompt": "   "}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Input validation error: Prompt must not be empty");
        assert_eq!(postgres.execute_calls(), 0);
        assert_eq!(summarizer.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let (app, _, _) = app(StubEngine::new(Engine::Mysql));

        let response = app.oneshot(post_query("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_health_and_index() {
        let (app, _, _) = app(StubEngine::new(Engine::Mysql));

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("id=\"queryForm\""));
    }

    #[tokio::test]
    async fn test_backend_health() {
        let (app, _, _) = app(StubEngine::new(Engine::Mysql).with_connection_error("refused"));

        let response = app
            .oneshot(Request::get("/health/backends").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["healthy"], false);
        assert_eq!(body["branches"]["postgres"]["status"], "ok");
        assert_eq!(body["branches"]["mysql"]["error"], "Database connection error");
    }

    #[tokio::test]
    async fn test_request_timeout_returns_json_error() {
        let slow = StubRetriever::new(Vec::new()).with_delay(Duration::from_millis(300));
        let (app, _, summarizer) =
            app_with(StubEngine::new(Engine::Mysql), slow, Duration::from_millis(50));

        let response = app
            .oneshot(post_query(r#"{"prompt": "list customers"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Timed out after 50ms");
        assert_eq!(summarizer.calls(), 0);
    }
}
