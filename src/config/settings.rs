//! Settings structures for History-Collab configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub engine: EngineSettings,
    pub ui: UiSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Merge with environment variables (HISTORY_COLLAB_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary variable lookup
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("HISTORY_COLLAB_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = lookup("HISTORY_COLLAB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("HISTORY_COLLAB_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("HISTORY_COLLAB_BASE_URL") {
            self.server.base_url = Some(val);
        }
        if let Some(val) = lookup("HISTORY_COLLAB_ENGINE_URL") {
            self.engine.endpoint = val;
        }
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ui = &self.ui;
        if ui.min_timeout > ui.max_timeout {
            return Err(ConfigError::Invalid(format!(
                "ui.min_timeout ({}) exceeds ui.max_timeout ({})",
                ui.min_timeout, ui.max_timeout
            )));
        }
        if !(ui.min_timeout..=ui.max_timeout).contains(&ui.default_timeout) {
            return Err(ConfigError::Invalid(format!(
                "ui.default_timeout ({}) is outside [{}, {}]",
                ui.default_timeout, ui.min_timeout, ui.max_timeout
            )));
        }
        if ui.timeout_step == 0 {
            return Err(ConfigError::Invalid(
                "ui.timeout_step must be greater than 0".to_string(),
            ));
        }
        if self.engine.credential_env.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "engine.credential_env must name an environment variable".to_string(),
            ));
        }
        url::Url::parse(&self.engine.endpoint).map_err(|source| ConfigError::InvalidEndpoint {
            endpoint: self.engine.endpoint.clone(),
            source,
        })?;
        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name displayed in UI
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "History-Data Collaboration System".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Base URL for the instance
    pub base_url: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: crate::DEFAULT_PORT,
            bind_address: "0.0.0.0".to_string(),
            base_url: None,
        }
    }
}

/// Collaboration engine connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// URL the query is posted to
    pub endpoint: String,
    /// Environment variable holding the API credential
    pub credential_env: String,
    /// Extra seconds allowed on top of the caller's timeout before giving up
    pub grace_secs: u64,
    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/query".to_string(),
            credential_env: "OPENAI_API_KEY".to_string(),
            grace_secs: 5,
            connect_timeout_secs: 10,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Lower slider bound in seconds
    pub min_timeout: u64,
    /// Upper slider bound in seconds
    pub max_timeout: u64,
    /// Slider step in seconds
    pub timeout_step: u64,
    /// Initial slider value
    pub default_timeout: u64,
    /// Placeholder shown in the empty question box
    pub placeholder: String,
    /// One-click example questions
    pub examples: Vec<ExampleQuery>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            min_timeout: crate::MIN_TIMEOUT,
            max_timeout: crate::MAX_TIMEOUT,
            timeout_step: crate::TIMEOUT_STEP,
            default_timeout: crate::DEFAULT_TIMEOUT,
            placeholder: "Ask anything... (e.g., 'How did urbanization rates in Europe compare \
                          to those in North America during the Industrial Revolution?')"
                .to_string(),
            examples: default_examples(),
        }
    }
}

/// Example question with a suggested timeout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleQuery {
    pub query: String,
    pub timeout: u64,
}

impl ExampleQuery {
    pub fn new(query: impl Into<String>, timeout: u64) -> Self {
        Self {
            query: query.into(),
            timeout,
        }
    }
}

/// Default example questions
fn default_examples() -> Vec<ExampleQuery> {
    vec![
        ExampleQuery::new(
            "How did urbanization rates in Europe compare to those in North America during \
             the Industrial Revolution, and what were the main factors influencing these trends?",
            120,
        ),
        ExampleQuery::new(
            "What were the economic impacts of the Silk Road on medieval trade patterns, \
             and how did it influence cultural exchange?",
            120,
        ),
        ExampleQuery::new(
            "Analyze the correlation between technological advancement and societal change \
             during the Renaissance period.",
            100,
        ),
        ExampleQuery::new(
            "Compare the population growth rates of major civilizations during the Bronze Age \
             and identify key factors.",
            120,
        ),
    ]
}
