//! Query gateway
//!
//! Turns user input into engine calls, and engine results or faults into
//! display text. Every path ends in a string; nothing is propagated to the
//! caller as an error.

use crate::engine::{CollaborationEngine, EngineError};
use crate::metrics::Metrics;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Shown when the question box is empty or whitespace-only
pub const EMPTY_QUERY_WARNING: &str = "⚠️ Please enter a question or task.";

/// Prefix of every failure message
pub const FAILURE_MARKER: &str = "❌ Error:";

/// Result of one gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The engine answered
    Answered(String),
    /// The query was empty; the engine was not called
    Rejected,
    /// The engine reported a fault
    Failed(EngineError),
}

impl Outcome {
    /// Short status name for the JSON API
    pub fn status(&self) -> &'static str {
        match self {
            Self::Answered(_) => "answered",
            Self::Rejected => "rejected",
            Self::Failed(_) => "failed",
        }
    }

    /// Display text for this outcome
    pub fn message(&self) -> String {
        match self {
            Self::Answered(answer) => answer.clone(),
            Self::Rejected => EMPTY_QUERY_WARNING.to_string(),
            Self::Failed(err) => failure_message(err),
        }
    }

    pub fn into_message(self) -> String {
        match self {
            Self::Answered(answer) => answer,
            other => other.message(),
        }
    }
}

/// Format an engine fault for display
pub fn failure_message(err: &EngineError) -> String {
    format!("{} {}\n\n{}", FAILURE_MARKER, err, err.retry_hint())
}

/// Adapter between the UI and the collaboration engine
pub struct QueryGateway {
    engine: Arc<dyn CollaborationEngine>,
    metrics: Arc<Metrics>,
}

impl QueryGateway {
    /// Create a gateway with its own metrics
    pub fn new(engine: Arc<dyn CollaborationEngine>) -> Self {
        Self::with_metrics(engine, Arc::new(Metrics::new()))
    }

    /// Create a gateway recording into shared metrics
    pub fn with_metrics(engine: Arc<dyn CollaborationEngine>, metrics: Arc<Metrics>) -> Self {
        Self { engine, metrics }
    }

    /// Answer a question, always producing display text
    pub async fn answer(&self, query: &str, timeout: u64) -> String {
        self.evaluate(query, timeout).await.into_message()
    }

    /// Answer a question and report which path was taken
    pub async fn evaluate(&self, query: &str, timeout: u64) -> Outcome {
        if query.trim().is_empty() {
            debug!("Rejected empty query");
            self.metrics.record_rejected();
            return Outcome::Rejected;
        }

        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            query_len = query.len(),
            timeout,
            "Forwarding query to {} engine",
            self.engine.name()
        );

        let start = Instant::now();
        let result = self.delegate(query, timeout).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(answer) => {
                info!(%request_id, elapsed_ms, "Query answered");
                self.metrics.record_answered(elapsed_ms);
                Outcome::Answered(answer)
            }
            Err(err) => {
                warn!(%request_id, elapsed_ms, kind = %err.kind(), "Query failed: {}", err);
                self.metrics.record_failure(err.kind(), elapsed_ms);
                Outcome::Failed(err)
            }
        }
    }

    /// Run the engine call on its own task; a panic surfaces as `Failed`.
    async fn delegate(&self, query: &str, timeout: u64) -> Result<String, EngineError> {
        let engine = Arc::clone(&self.engine);
        let query = query.to_string();
        let handle =
            tokio::spawn(async move { engine.process_query(&query, timeout).await });

        match handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => Err(EngineError::Failed(
                "collaboration engine crashed while answering".to_string(),
            )),
            Err(_) => Err(EngineError::Failed(
                "collaboration engine task was cancelled".to_string(),
            )),
        }
    }

    /// Name of the engine behind this gateway
    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
