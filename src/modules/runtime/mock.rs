//! Hand-written stand-ins for the external collaborators, used by tests

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tributary_core::{SchemaDescription, TributaryError};
use tributary_types::{Engine, ResultSet, RetrievedPassage};

use crate::connectors::SqlEngine;
use crate::llm::{Embedder, LanguageModel};
use crate::retrieval::{IndexMatch, Retriever, VectorIndex, VectorRecord};

type Responder = Box<dyn Fn(&str) -> Result<String, TributaryError> + Send + Sync>;

/// Language model answering from a closure and recording every prompt
pub struct ScriptedModel {
    responder: Responder,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, TributaryError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::new(move |_| Err(TributaryError::Llm(message.clone())))
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, TributaryError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.responder)(prompt)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Relational engine returning canned schema and rows
pub struct StubEngine {
    engine: Engine,
    schema: SchemaDescription,
    schema_error: Option<String>,
    rows: ResultSet,
    execute_error: Option<String>,
    connection_error: Option<String>,
    delay: Option<Duration>,
    describe_calls: AtomicUsize,
    statements: Mutex<Vec<String>>,
}

impl StubEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            schema: SchemaDescription::empty(),
            schema_error: None,
            rows: Vec::new(),
            execute_error: None,
            connection_error: None,
            delay: None,
            describe_calls: AtomicUsize::new(0),
            statements: Mutex::new(Vec::new()),
        }
    }

    pub fn with_schema(mut self, schema: SchemaDescription) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_schema_error(mut self, message: &str) -> Self {
        self.schema_error = Some(message.to_string());
        self
    }

    pub fn with_rows(mut self, rows: ResultSet) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_execute_error(mut self, message: &str) -> Self {
        self.execute_error = Some(message.to_string());
        self
    }

    /// Fail execution and health checks as an unreachable server would
    pub fn with_connection_error(mut self, message: &str) -> Self {
        self.connection_error = Some(message.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    pub fn execute_calls(&self) -> usize {
        self.statements.lock().unwrap().len()
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

#[async_trait]
impl SqlEngine for StubEngine {
    async fn describe_schema(&self) -> Result<SchemaDescription, TributaryError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        match &self.schema_error {
            Some(message) => Err(TributaryError::Introspection(message.clone())),
            None => Ok(self.schema.clone()),
        }
    }

    async fn execute(&self, statement: &str) -> Result<ResultSet, TributaryError> {
        self.statements.lock().unwrap().push(statement.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.connection_error {
            return Err(TributaryError::Database(message.clone()));
        }
        match &self.execute_error {
            Some(message) => Err(TributaryError::QueryExecution(message.clone())),
            None => Ok(self.rows.clone()),
        }
    }

    async fn health_check(&self) -> Result<(), TributaryError> {
        match &self.connection_error {
            Some(message) => Err(TributaryError::Database(message.clone())),
            None => Ok(()),
        }
    }

    fn engine(&self) -> Engine {
        self.engine
    }
}

/// Retriever returning fixed passages
#[derive(Default)]
pub struct StubRetriever {
    passages: Vec<RetrievedPassage>,
    error: Option<String>,
    delay: Option<Duration>,
}

impl StubRetriever {
    pub fn new(passages: Vec<RetrievedPassage>) -> Self {
        Self {
            passages,
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl Retriever for StubRetriever {
    async fn retrieve(&self, _user_query: &str) -> Result<Vec<RetrievedPassage>, TributaryError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.error {
            Some(message) => Err(TributaryError::Retrieval(message.clone())),
            None => Ok(self.passages.clone()),
        }
    }
}

/// Embedder mapping every text to `[0, 0, 1]`
#[derive(Default)]
pub struct StubEmbedder {
    fail: bool,
    calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, TributaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TributaryError::Retrieval("embedding service unavailable".to_string()));
        }
        Ok(texts.iter().map(|_| vec![0.0, 0.0, 1.0]).collect())
    }
}

/// In-memory index ranking by cosine similarity
#[derive(Default)]
pub struct MemoryIndex {
    records: Mutex<BTreeMap<String, VectorRecord>>,
    ready_calls: AtomicUsize,
}

impl MemoryIndex {
    pub fn ids(&self) -> Vec<String> {
        self.records.lock().unwrap().keys().cloned().collect()
    }

    pub fn ready_calls(&self) -> usize {
        self.ready_calls.load(Ordering::SeqCst)
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denominator = norm(a) * norm(b);
    if denominator == 0.0 {
        0.0
    } else {
        dot / denominator
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn ensure_ready(&self) -> Result<(), TributaryError> {
        self.ready_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, TributaryError> {
        let count = records.len();
        let mut stored = self.records.lock().unwrap();
        for record in records {
            stored.insert(record.id.clone(), record);
        }
        Ok(count)
    }

    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<IndexMatch>, TributaryError> {
        let stored = self.records.lock().unwrap();
        let mut matches: Vec<IndexMatch> = stored
            .values()
            .map(|r| IndexMatch {
                id: r.id.clone(),
                score: cosine(&vector, &r.values),
                text: r.text.clone(),
                filename: r.filename.clone(),
            })
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);
        Ok(matches)
    }
}
