//! HTTP transport to a collaboration engine deployed as a service

use super::traits::{CollaborationEngine, EngineError};
use crate::bootstrap::Credential;
use crate::config::{ConfigError, EngineSettings};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

/// Longest slice of an error body shown to the user
const MAX_UPSTREAM_MESSAGE: usize = 300;

/// Body posted to the engine
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    timeout: u64,
}

/// Body returned by the engine
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QueryReply {
    answer: Option<String>,
    error: Option<String>,
}

/// Engine reached over HTTP
pub struct RemoteEngine {
    client: Client,
    endpoint: Url,
    credential: Credential,
    grace: Duration,
}

impl RemoteEngine {
    /// Create a remote engine from settings
    pub fn new(settings: &EngineSettings, credential: Credential) -> Result<Self, ConfigError> {
        let endpoint =
            Url::parse(&settings.endpoint).map_err(|source| ConfigError::InvalidEndpoint {
                endpoint: settings.endpoint.clone(),
                source,
            })?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .user_agent(format!("history-collab/{}", crate::VERSION))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            credential,
            grace: Duration::from_secs(settings.grace_secs),
        })
    }

    /// Override the slack added to the caller's timeout
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Endpoint the queries are posted to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(&self, query: &str, timeout_secs: u64) -> Result<String, EngineError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.credential.expose())
            .json(&QueryRequest {
                query,
                timeout: timeout_secs,
            })
            .send()
            .await
            .map_err(|e| classify(e, timeout_secs))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify(e, timeout_secs))?;

        if !status.is_success() {
            return Err(EngineError::Upstream {
                status: status.as_u16(),
                message: upstream_message(status, &text),
            });
        }

        let reply: QueryReply = serde_json::from_str(&text)
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        match (reply.answer, reply.error) {
            (Some(answer), _) => Ok(answer),
            (None, Some(error)) => Err(EngineError::Failed(error)),
            (None, None) => Err(EngineError::InvalidResponse(
                "reply has no answer field".to_string(),
            )),
        }
    }
}

#[async_trait]
impl CollaborationEngine for RemoteEngine {
    fn name(&self) -> &str {
        "remote"
    }

    async fn process_query(&self, query: &str, timeout_secs: u64) -> Result<String, EngineError> {
        let budget = Duration::from_secs(timeout_secs).saturating_add(self.grace);
        debug!("Posting query to {} with budget {:?}", self.endpoint, budget);

        match timeout(budget, self.send(query, timeout_secs)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(timeout_secs)),
        }
    }
}

/// Map a transport error onto an engine error
fn classify(err: reqwest::Error, timeout_secs: u64) -> EngineError {
    if err.is_timeout() {
        EngineError::Timeout(timeout_secs)
    } else if err.is_connect() || err.is_request() {
        EngineError::Unavailable(err.to_string())
    } else if err.is_decode() || err.is_body() {
        EngineError::InvalidResponse(err.to_string())
    } else {
        EngineError::Unavailable(err.to_string())
    }
}

/// Best human-readable message from a failed reply
fn upstream_message(status: StatusCode, body: &str) -> String {
    if let Ok(QueryReply {
        error: Some(error), ..
    }) = serde_json::from_str::<QueryReply>(body)
    {
        return truncate_chars(&error, MAX_UPSTREAM_MESSAGE);
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return truncate_chars(trimmed, MAX_UPSTREAM_MESSAGE);
    }

    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
