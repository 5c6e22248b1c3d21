//! Startup wiring: resolve the credential and construct the engine once

use crate::config::{ConfigError, Settings};
use crate::engine::{CollaborationEngine, RemoteEngine};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// API credential read from the environment. Never printed.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Resolve the credential named `var` through `lookup`.
    ///
    /// Absent and blank values are both treated as missing.
    pub fn resolve<F>(var: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(var) {
            Some(value) if !value.trim().is_empty() => Ok(Self(value)),
            _ => Err(ConfigError::MissingCredential {
                var: var.to_string(),
            }),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Build the process-wide engine from settings and the process environment
pub fn build_engine(settings: &Settings) -> Result<Arc<dyn CollaborationEngine>, ConfigError> {
    build_engine_with(settings, |key| std::env::var(key).ok())
}

/// Build the engine, reading the credential through `lookup`
pub fn build_engine_with<F>(
    settings: &Settings,
    lookup: F,
) -> Result<Arc<dyn CollaborationEngine>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let credential = Credential::resolve(&settings.engine.credential_env, lookup)?;
    info!("Initializing collaboration engine...");
    let engine = RemoteEngine::new(&settings.engine, credential)?;
    info!("Collaboration engine ready at {}", engine.endpoint());
    Ok(Arc::new(engine))
}
