//! Application setup and initialization
//!
//! Startup is split out of main.rs so tests can build the same router around
//! their own state.

pub mod routes;
pub mod server;

use crate::repository::InMemoryUploadRepository;
use crate::state::AppState;
use anyhow::{Context, Result};
use poet_core::Config;
use poet_infra::{init_telemetry, LogFormat};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    init_telemetry(
        env!("CARGO_PKG_NAME"),
        config.environment(),
        LogFormat::for_environment(config.environment()),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let uploads = poet_storage::create_manager(&config.storage)
        .await
        .context("Failed to initialize upload storage")?;
    tracing::info!(
        primary_backend = %uploads.primary_backend(),
        "Upload storage initialized"
    );

    let state = Arc::new(AppState::new(
        config,
        uploads,
        Arc::new(InMemoryUploadRepository::new()),
    ));

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
