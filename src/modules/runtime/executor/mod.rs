//! SQL synthesis module
//!
//! Handles gating, schema introspection, prompt rendering, read-only
//! validation, and execution of model-written SQL.

mod substitutor;
mod validator;

pub use substitutor::PromptTemplate;
pub use validator::ReadOnlyValidator;

use std::sync::Arc;
use tributary_core::{
    DatabaseConfig, IntrospectionPolicy, KeywordGate, SchemaDescription, TributaryError,
};
use tributary_types::ResultSet;
use tracing::{debug, error, info, warn};

use crate::connectors::SqlEngine;
use crate::llm::LanguageModel;
use crate::prompts::SQL_SYNTHESIS_TEMPLATE;

/// Turns a question into rows from one relational engine
pub struct SqlSynthesizer {
    name: String,
    engine: Arc<dyn SqlEngine>,
    model: Arc<dyn LanguageModel>,
    gate: KeywordGate,
    policy: IntrospectionPolicy,
    template: PromptTemplate,
    validator: ReadOnlyValidator,
}

impl SqlSynthesizer {
    /// Create an ungated synthesizer with the default introspection policy
    pub fn new(
        name: impl Into<String>,
        engine: Arc<dyn SqlEngine>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            name: name.into(),
            engine,
            model,
            gate: KeywordGate::open(),
            policy: IntrospectionPolicy::default(),
            template: PromptTemplate::new(SQL_SYNTHESIS_TEMPLATE),
            validator: ReadOnlyValidator::new(),
        }
    }

    /// Create a synthesizer with the gate and policy of a configured branch
    pub fn from_config(
        config: &DatabaseConfig,
        engine: Arc<dyn SqlEngine>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self::new(&config.name, engine, model)
            .with_gate(config.gate())
            .with_policy(config.introspection)
    }

    pub fn with_gate(mut self, gate: KeywordGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_policy(mut self, policy: IntrospectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Branch name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Engine display name used in the summary prompt
    pub fn label(&self) -> &'static str {
        self.engine.engine().label()
    }

    /// Answer a question with rows, or `[]` when the gate is closed
    pub async fn synthesize_and_run(&self, user_query: &str) -> Result<ResultSet, TributaryError> {
        if !self.gate.allows(user_query) {
            info!(
                branch = %self.name,
                "Query does not contain any of {:?}; no SQL query generated",
                self.gate.keywords()
            );
            return Ok(Vec::new());
        }

        let schema = self.schema().await?;
        let prompt = self.template.render(&[
            ("schema_info", schema.text.as_str()),
            ("user_query", user_query),
        ])?;

        let raw = self.model.complete(&prompt).await?;
        let statement = self.validator.validate(&raw)?;
        info!(branch = %self.name, engine = %self.engine.engine(), "Generated SQL query: {}", statement);

        match self.engine.execute(&statement).await {
            Ok(rows) => {
                debug!(branch = %self.name, "Query returned {} rows", rows.len());
                Ok(rows)
            }
            Err(e) => {
                error!(
                    branch = %self.name,
                    engine = %self.engine.engine(),
                    sql = %statement,
                    "Error executing SQL query: {}",
                    e
                );
                Err(e)
            }
        }
    }

    async fn schema(&self) -> Result<SchemaDescription, TributaryError> {
        match self.engine.describe_schema().await {
            Ok(schema) => Ok(schema),
            Err(e) => match self.policy {
                IntrospectionPolicy::Degrade => {
                    warn!(
                        branch = %self.name,
                        engine = %self.engine.engine(),
                        "Schema introspection failed, continuing without schema: {}",
                        e
                    );
                    Ok(SchemaDescription::empty())
                }
                IntrospectionPolicy::Fail => Err(e),
            },
        }
    }
}
