//! History-Collab: a web gateway for asking historical questions of a
//! multi-agent collaboration engine.
//!
//! The service validates the question, forwards it with a timeout to the
//! engine, and always renders a string: the answer, a warning, or a
//! formatted error.

pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod gateway;
pub mod metrics;
pub mod web;

pub use config::Settings;
pub use engine::{CollaborationEngine, EngineError};
pub use gateway::{Outcome, QueryGateway};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default port for the web interface
pub const DEFAULT_PORT: u16 = 7860;

/// Default timeout in seconds offered by the UI
pub const DEFAULT_TIMEOUT: u64 = 120;

/// Minimum timeout the UI slider allows
pub const MIN_TIMEOUT: u64 = 30;

/// Maximum timeout the UI slider allows
pub const MAX_TIMEOUT: u64 = 300;

/// Slider granularity in seconds
pub const TIMEOUT_STEP: u64 = 10;
