//! Engine trait and error types

use async_trait::async_trait;
use thiserror::Error;

/// Faults an engine can report for a single query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine ran but could not produce an answer
    #[error("{0}")]
    Failed(String),
    /// No answer within the requested number of seconds
    #[error("no answer within {0} seconds")]
    Timeout(u64),
    /// The engine could not be reached
    #[error("collaboration engine unavailable: {0}")]
    Unavailable(String),
    /// The engine replied with a non-success status
    #[error("collaboration engine returned {status}: {message}")]
    Upstream { status: u16, message: String },
    /// The engine replied but the answer could not be read
    #[error("unreadable answer from collaboration engine: {0}")]
    InvalidResponse(String),
}

impl EngineError {
    /// Stable short name used in logs and stats
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Failed(_) => ErrorKind::Failed,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::InvalidResponse(_) => ErrorKind::InvalidResponse,
        }
    }

    /// Suggestion shown to the user underneath the error
    pub fn retry_hint(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "Please try again or increase the timeout value.",
            Self::Unavailable(_) => "Please try again in a moment or adjust the timeout value.",
            Self::Failed(_) | Self::Upstream { .. } | Self::InvalidResponse(_) => {
                "Please try again or reduce the timeout value."
            }
        }
    }
}

/// Tag of an [`EngineError`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Failed,
    Timeout,
    Unavailable,
    Upstream,
    InvalidResponse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Failed => "failed",
            Self::Timeout => "timeout",
            Self::Unavailable => "unavailable",
            Self::Upstream => "upstream",
            Self::InvalidResponse => "invalid_response",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can answer a historical question.
///
/// Implementations are shared across concurrent requests, so they must be
/// safe to call from several tasks at once.
#[async_trait]
pub trait CollaborationEngine: Send + Sync {
    /// Engine name for logs and the health endpoint
    fn name(&self) -> &str;

    /// Answer `query`, spending at most roughly `timeout` seconds.
    ///
    /// The timeout is a hint; how strictly it is enforced is up to the
    /// implementation.
    async fn process_query(&self, query: &str, timeout: u64) -> Result<String, EngineError>;
}
