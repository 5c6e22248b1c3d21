//! Configuration module for History-Collab
//!
//! Handles loading and validating settings from YAML files, `.env` files and
//! environment variables.

mod settings;

pub use settings::*;

use std::path::PathBuf;
use thiserror::Error;

/// Startup configuration faults. None of these are recoverable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} not found in environment variables. Please set it in your .env file")]
    MissingCredential { var: String },

    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid engine endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Load a `.env` file from the working directory if one exists.
///
/// Returns the path that was loaded.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load settings from file or use defaults, then apply environment overrides.
///
/// Returns the settings together with the file they came from, if any.
pub fn load() -> Result<(Settings, Option<PathBuf>), ConfigError> {
    let (mut settings, source) = match find_settings_file() {
        Some(path) => (Settings::from_file(&path)?, Some(path)),
        None => (Settings::default(), None),
    };
    settings.merge_env();
    settings.validate()?;
    Ok((settings, source))
}

/// Locate the settings file, honouring HISTORY_COLLAB_SETTINGS_PATH first
fn find_settings_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("HISTORY_COLLAB_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/history-collab/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("history-collab/settings.yml"));
    }

    paths.into_iter().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reports_path() {
        let err = Settings::from_file("/nonexistent/history-collab.yml").unwrap_err();
        match err {
            ConfigError::Read { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/history-collab.yml"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_credential_message() {
        let err = ConfigError::MissingCredential {
            var: "OPENAI_API_KEY".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "OPENAI_API_KEY not found in environment variables. Please set it in your .env file"
        );
    }
}
