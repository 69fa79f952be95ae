//! Application state and sub-state extractors.
//!
//! Built once at startup and shared read-only by every request. Handlers that only need
//! the ingest limits extract [`UploadLimits`] through Axum's `FromRef`.

use crate::constants::{MAX_FORM_FIELD_BYTES, MULTIPART_OVERHEAD_BYTES};
use crate::services::chunks::ChunkUploadService;
use reeldrop_core::{Config, SessionIdSource};
use reeldrop_storage::Storage;
use std::sync::Arc;
use std::time::Duration;

/// Size and shape limits applied to direct chunk ingest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_chunk_size_bytes: usize,
    pub max_form_fields: usize,
    pub max_field_bytes: usize,
}

impl UploadLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_chunk_size_bytes: config.max_chunk_size_bytes(),
            max_form_fields: config.max_form_fields(),
            max_field_bytes: MAX_FORM_FIELD_BYTES,
        }
    }

    /// Upper bound on a whole ingest request body, framing included.
    pub fn max_request_bytes(&self) -> usize {
        self.max_chunk_size_bytes
            .saturating_add(self.max_form_fields.saturating_mul(self.max_field_bytes))
            .saturating_add(MULTIPART_OVERHEAD_BYTES)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub session_ids: SessionIdSource,
    pub chunks: ChunkUploadService,
    pub limits: UploadLimits,
}

impl AppState {
    pub fn new(
        storage: Arc<dyn Storage>,
        session_ids: SessionIdSource,
        limits: UploadLimits,
        presign_ttl: Duration,
    ) -> Self {
        Self {
            session_ids,
            chunks: ChunkUploadService::new(storage, presign_ttl),
            limits,
        }
    }

    pub fn from_config(config: &Config, storage: Arc<dyn Storage>) -> Self {
        Self::new(
            storage,
            config.session_id_source(),
            UploadLimits::from_config(config),
            Duration::from_secs(config.presign_ttl_secs()),
        )
    }
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for UploadLimits {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.limits.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for ChunkUploadService {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.chunks.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_limit_covers_chunk_and_fields() {
        let limits = UploadLimits {
            max_chunk_size_bytes: 25 * 1024 * 1024,
            max_form_fields: 8,
            max_field_bytes: MAX_FORM_FIELD_BYTES,
        };
        assert!(limits.max_request_bytes() > limits.max_chunk_size_bytes + 8 * 4096);
        // Still far below a chunk that is one MiB over the cap.
        assert!(limits.max_request_bytes() < 26 * 1024 * 1024);
    }

    #[test]
    fn test_request_limit_saturates() {
        let limits = UploadLimits {
            max_chunk_size_bytes: usize::MAX - 1,
            max_form_fields: usize::MAX,
            max_field_bytes: MAX_FORM_FIELD_BYTES,
        };
        assert_eq!(limits.max_request_bytes(), usize::MAX);
    }
}
