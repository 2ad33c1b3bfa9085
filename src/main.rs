//! # Dicehall
//!
//! A session-gated multiplayer room server.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Database connection pool
//! - Redis session store
//! - HTTP/WebSocket server

use anyhow::Result;
use tracing::info;

use dicehall::config::Settings;
use dicehall::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    dicehall::telemetry::init_tracing();

    info!("Starting Dicehall server...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
