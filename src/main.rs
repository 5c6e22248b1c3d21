//! History-Collab: web gateway to a multi-agent collaboration engine
//!
//! This is the main entry point for the application.

use anyhow::Result;
use history_collab::{
    bootstrap, config,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = config::load_dotenv();

    // Load configuration
    let (settings, source) = config::load()?;

    // Initialize logging
    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting History-Collab v{}", history_collab::VERSION);
    if let Some(path) = dotenv {
        info!("Loaded environment from: {}", path.display());
    }
    match source {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }

    // Fails here, before anything is served, when the credential is missing
    let engine = bootstrap::build_engine(&settings)?;

    // Create application state
    let state = AppState::new(settings.clone(), engine)?;
    info!("Application state initialized");

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    match settings.server.base_url {
        Some(ref base_url) => info!("Launching UI on http://{} ({})", addr, base_url),
        None => info!("Launching UI on http://{}", addr),
    }

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve when the process receives Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
