//! Application setup and initialization
//!
//! Startup order: telemetry, storage, shared state, routes. Configuration has already
//! been validated by `Config::from_env`.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use reeldrop_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_json())?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        session_id_source = %config.session_id_source(),
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config)
        .await
        .context("Failed to initialize storage")?;

    let state = Arc::new(AppState::from_config(&config, storage));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
