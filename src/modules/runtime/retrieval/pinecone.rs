//! Pinecone-compatible vector index client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tributary_core::{IndexConfig, TributaryError};
use tracing::{debug, info};

use super::traits::{IndexMatch, VectorIndex, VectorRecord};

const API_VERSION: &str = "2024-07";
const UPSERT_BATCH: usize = 100;

#[derive(Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Deserialize)]
struct IndexDescription {
    name: String,
    #[serde(default)]
    host: String,
    #[serde(default)]
    status: IndexStatus,
}

#[derive(Deserialize, Default)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: Metadata<'a>,
}

#[derive(Serialize)]
struct Metadata<'a> {
    text: &'a str,
    filename: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: serde_json::Map<String, serde_json::Value>,
}

/// Index client; the data-plane host is resolved once and cached
pub struct PineconeIndex {
    http: reqwest::Client,
    config: IndexConfig,
    host: OnceCell<String>,
    poll_interval: Duration,
}

impl PineconeIndex {
    pub fn new(config: &IndexConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config: config.clone(),
            host: OnceCell::new(),
            poll_interval: Duration::from_secs(1),
        }
    }

    /// Override how often readiness is polled after creating the index
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn control(&self, path: &str) -> String {
        format!("{}{}", self.config.control_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
    }

    async fn send<R: for<'de> Deserialize<'de>>(
        &self,
        builder: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<R, TributaryError> {
        let response = builder
            .send()
            .await
            .map_err(|e| TributaryError::Retrieval(format!("{} failed: {}", what, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TributaryError::Retrieval(format!(
                "{} returned {}: {}",
                what, status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TributaryError::Retrieval(format!("Failed to parse {} response: {}", what, e)))
    }

    async fn describe(&self) -> Result<IndexDescription, TributaryError> {
        let url = self.control(&format!("/indexes/{}", self.config.name));
        self.send(self.request(reqwest::Method::GET, url), "Describe index")
            .await
    }

    async fn resolve_host(&self) -> Result<String, TributaryError> {
        let list: IndexList = self
            .send(
                self.request(reqwest::Method::GET, self.control("/indexes")),
                "List indexes",
            )
            .await?;

        if let Some(existing) = list.indexes.into_iter().find(|i| i.name == self.config.name) {
            if existing.status.ready && !existing.host.is_empty() {
                info!("Index already exists: {}", self.config.name);
                return Ok(existing.host);
            }
        } else {
            let body = json!({
                "name": self.config.name,
                "dimension": self.config.dimension,
                "metric": self.config.metric,
                "spec": {
                    "serverless": {
                        "cloud": self.config.cloud,
                        "region": self.config.region,
                    }
                }
            });
            let _: serde_json::Value = self
                .send(
                    self.request(reqwest::Method::POST, self.control("/indexes"))
                        .json(&body),
                    "Create index",
                )
                .await?;
            info!(
                "Index created: {} (dimension {}, metric {})",
                self.config.name, self.config.dimension, self.config.metric
            );
        }

        let deadline = Instant::now() + self.config.ready_timeout();
        loop {
            let description = self.describe().await?;
            if description.status.ready && !description.host.is_empty() {
                return Ok(description.host);
            }
            if Instant::now() + self.poll_interval > deadline {
                return Err(TributaryError::Retrieval(format!(
                    "Index '{}' was not ready after {}s",
                    self.config.name, self.config.ready_timeout_secs
                )));
            }
            debug!("Waiting for index '{}' to become ready", self.config.name);
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn data_url(&self, path: &str) -> Result<String, TributaryError> {
        let host = self.host.get_or_try_init(|| self.resolve_host()).await?;
        let base = if host.starts_with("http") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", host.trim_end_matches('/'))
        };
        Ok(format!("{}{}", base, path))
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn ensure_ready(&self) -> Result<(), TributaryError> {
        self.data_url("").await.map(|_| ())
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, TributaryError> {
        let url = self.data_url("/vectors/upsert").await?;
        let mut written = 0;

        for batch in records.chunks(UPSERT_BATCH) {
            let vectors: Vec<UpsertVector<'_>> = batch
                .iter()
                .map(|r| UpsertVector {
                    id: &r.id,
                    values: &r.values,
                    metadata: Metadata {
                        text: &r.text,
                        filename: &r.filename,
                    },
                })
                .collect();
            let mut body = json!({ "vectors": vectors });
            if let Some(namespace) = &self.config.namespace {
                body["namespace"] = json!(namespace);
            }

            let response: UpsertResponse = self
                .send(
                    self.request(reqwest::Method::POST, url.clone()).json(&body),
                    "Upsert vectors",
                )
                .await?;
            written += response.upserted_count;
        }

        Ok(written)
    }

    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<IndexMatch>, TributaryError> {
        let url = self.data_url("/query").await?;
        let mut body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });
        if let Some(namespace) = &self.config.namespace {
            body["namespace"] = json!(namespace);
        }

        let response: QueryResponse = self
            .send(
                self.request(reqwest::Method::POST, url).json(&body),
                "Query index",
            )
            .await?;

        Ok(response
            .matches
            .into_iter()
            .map(|m| {
                let field = |name: &str| {
                    m.metadata
                        .get(name)
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string()
                };
                IndexMatch {
                    text: field("text"),
                    filename: field("filename"),
                    id: m.id,
                    score: m.score,
                }
            })
            .collect())
    }
}
