//! Fan-out/fan-in question answering
//!
//! One question goes to both SQL synthesizers and the semantic retriever at
//! once. All three run to completion; if any failed, the first failure (in
//! completion order) is returned and the others are logged. Otherwise the
//! three results fill fixed slots of the summary prompt and the language model
//! writes the answer.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tributary_core::TributaryError;
use tributary_types::{render_passages, render_rows, ResultSet, RetrievedPassage};
use tracing::{error, info, info_span, Instrument};

use crate::executor::{PromptTemplate, SqlSynthesizer};
use crate::llm::LanguageModel;
use crate::prompts::SUMMARY_TEMPLATE;
use crate::retrieval::Retriever;

/// Branch name used for the semantic retriever
pub const RETRIEVER_BRANCH: &str = "retriever";

/// The final answer plus per-branch result counts
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeAnswer {
    pub text: String,
    pub engine_a_rows: usize,
    pub passages: usize,
    pub engine_b_rows: usize,
}

enum BranchOutput {
    EngineA(ResultSet),
    Passages(Vec<RetrievedPassage>),
    EngineB(ResultSet),
}

/// Dispatches a question to every backend and merges the results
pub struct Orchestrator {
    engine_a: Arc<SqlSynthesizer>,
    engine_b: Arc<SqlSynthesizer>,
    retriever: Arc<dyn Retriever>,
    model: Arc<dyn LanguageModel>,
    template: PromptTemplate,
    branch_timeout: Option<Duration>,
}

impl Orchestrator {
    pub fn new(
        engine_a: SqlSynthesizer,
        engine_b: SqlSynthesizer,
        retriever: Arc<dyn Retriever>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            engine_a: Arc::new(engine_a),
            engine_b: Arc::new(engine_b),
            retriever,
            model,
            template: PromptTemplate::new(SUMMARY_TEMPLATE),
            branch_timeout: None,
        }
    }

    /// Bound each branch; `None` lets branches run as long as they need
    pub fn with_branch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.branch_timeout = timeout;
        self
    }

    /// Answer a question from all three sources
    pub async fn answer(&self, user_query: &str) -> Result<CompositeAnswer, TributaryError> {
        if user_query.trim().is_empty() {
            return Err(TributaryError::InputValidation(
                "Prompt must not be empty".to_string(),
            ));
        }

        let (engine_a_rows, passages, engine_b_rows) = self.fan_out(user_query).await?;
        info!(
            "Branches finished: {} {} rows, {} passages, {} {} rows",
            self.engine_a.name(),
            engine_a_rows.len(),
            passages.len(),
            self.engine_b.name(),
            engine_b_rows.len()
        );

        let engine_a_results = render_rows(&engine_a_rows);
        let vector_results = render_passages(&passages);
        let engine_b_results = render_rows(&engine_b_rows);
        let prompt = self.template.render(&[
            ("user_query", user_query),
            ("engine_a_label", self.engine_a.label()),
            ("engine_a_results", &engine_a_results),
            ("vector_results", &vector_results),
            ("engine_b_label", self.engine_b.label()),
            ("engine_b_results", &engine_b_results),
        ])?;

        let text = self.model.complete(&prompt).await.map_err(|e| {
            error!("Error generating summary: {}", e);
            TributaryError::Synthesis(e.to_string())
        })?;

        Ok(CompositeAnswer {
            text,
            engine_a_rows: engine_a_rows.len(),
            passages: passages.len(),
            engine_b_rows: engine_b_rows.len(),
        })
    }

    async fn fan_out(
        &self,
        user_query: &str,
    ) -> Result<(ResultSet, Vec<RetrievedPassage>, ResultSet), TributaryError> {
        let query: Arc<str> = Arc::from(user_query);
        let mut set = JoinSet::new();

        let synthesizer = self.engine_a.clone();
        let q = query.clone();
        set.spawn(run_branch(
            synthesizer.name().to_string(),
            self.branch_timeout,
            async move {
                synthesizer
                    .synthesize_and_run(&q)
                    .await
                    .map(BranchOutput::EngineA)
            },
        ));

        let retriever = self.retriever.clone();
        let q = query.clone();
        set.spawn(run_branch(
            RETRIEVER_BRANCH.to_string(),
            self.branch_timeout,
            async move { retriever.retrieve(&q).await.map(BranchOutput::Passages) },
        ));

        let synthesizer = self.engine_b.clone();
        let q = query;
        set.spawn(run_branch(
            synthesizer.name().to_string(),
            self.branch_timeout,
            async move {
                synthesizer
                    .synthesize_and_run(&q)
                    .await
                    .map(BranchOutput::EngineB)
            },
        ));

        let mut engine_a = None;
        let mut passages = None;
        let mut engine_b = None;
        let mut first_error: Option<TributaryError> = None;

        while let Some(joined) = set.join_next().await {
            let outcome = joined
                .map_err(|e| TributaryError::Internal(format!("Branch task failed: {}", e)))
                .and_then(|(name, result)| result.map_err(|e| e.in_branch(name)));

            match outcome {
                Ok(BranchOutput::EngineA(rows)) => engine_a = Some(rows),
                Ok(BranchOutput::Passages(found)) => passages = Some(found),
                Ok(BranchOutput::EngineB(rows)) => engine_b = Some(rows),
                Err(e) if first_error.is_none() => {
                    error!("{}", e);
                    first_error = Some(e);
                }
                Err(e) => error!("Additional failure after the first: {}", e),
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        match (engine_a, passages, engine_b) {
            (Some(a), Some(p), Some(b)) => Ok((a, p, b)),
            _ => Err(TributaryError::Internal(
                "A branch finished without a result".to_string(),
            )),
        }
    }
}

/// Run one branch inside its own span, bounded by the optional timeout
async fn run_branch<F>(
    name: String,
    timeout: Option<Duration>,
    work: F,
) -> (String, Result<BranchOutput, TributaryError>)
where
    F: Future<Output = Result<BranchOutput, TributaryError>>,
{
    let span = info_span!("branch", name = %name);
    let result = async move {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, work).await.unwrap_or_else(|_| {
                Err(TributaryError::Timeout {
                    millis: limit.as_millis() as u64,
                })
            }),
            None => work.await,
        }
    }
    .instrument(span)
    .await;

    (name, result)
}
