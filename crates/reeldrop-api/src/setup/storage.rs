//! Storage setup and initialization

use anyhow::Result;
use reeldrop_core::{Config, StorageBackend};
use reeldrop_storage::{create_storage, Storage};
use std::sync::Arc;

/// Build the process-wide storage handle from validated configuration.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config).await?;
    let backend_type = storage.backend_type();

    if backend_type == StorageBackend::Local {
        tracing::warn!(
            path = ?config.local_storage_path(),
            "Local storage backend cannot presign; chunk signing requests will fail"
        );
    }

    tracing::info!(backend = %backend_type, "Storage initialized successfully");
    Ok(storage)
}
