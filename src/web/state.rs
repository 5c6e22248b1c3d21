//! Application state shared across handlers

use crate::config::Settings;
use crate::engine::CollaborationEngine;
use crate::gateway::QueryGateway;
use crate::metrics::Metrics;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Query gateway wrapping the engine
    pub gateway: Arc<QueryGateway>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create new application state around an already constructed engine
    pub fn new(
        settings: Settings,
        engine: Arc<dyn CollaborationEngine>,
    ) -> anyhow::Result<Self> {
        let settings = Arc::new(settings);
        let metrics = Arc::new(Metrics::new());
        let gateway = Arc::new(QueryGateway::with_metrics(engine, metrics));
        let templates = Arc::new(super::Templates::new()?);

        Ok(Self {
            settings,
            gateway,
            templates,
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }

    /// Timeout used when a request does not carry one
    pub fn default_timeout(&self) -> u64 {
        self.settings.ui.default_timeout
    }
}
