//! Chunk upload service.
//!
//! Issues presigned chunk writes, ingests chunks through the server and acknowledges
//! finalization. Every operation performs at most one outbound call to the store, and all
//! input validation happens before that call.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reeldrop_core::constants::DEFAULT_CHUNK_CONTENT_TYPE;
use reeldrop_core::models::{ChunkWriteGrant, ChunkWriteReceipt, FinalizeOutcome};
use reeldrop_core::{chunk_key, chunk_prefix, AppError, AppResult};
use reeldrop_storage::Storage;
use std::sync::Arc;
use std::time::Duration;

/// Turns a finished session into a [`FinalizeOutcome`].
#[async_trait]
pub trait ChunkAssembler: Send + Sync {
    async fn assemble(&self, session_id: &str, prefix: String) -> AppResult<FinalizeOutcome>;
}

/// Leaves chunks where they are and reports their prefix.
///
/// Does not check that any chunk exists or that indices are contiguous.
pub struct AcknowledgeOnly;

#[async_trait]
impl ChunkAssembler for AcknowledgeOnly {
    async fn assemble(&self, session_id: &str, prefix: String) -> AppResult<FinalizeOutcome> {
        tracing::debug!(session_id = %session_id, prefix = %prefix, "Session acknowledged");
        Ok(FinalizeOutcome::Acknowledged { prefix })
    }
}

/// A chunk received through the server.
#[derive(Debug, Clone)]
pub struct ChunkUpload {
    pub session_id: String,
    pub index: u64,
    pub data: Bytes,
    /// MIME type declared by the client, if any
    pub content_type: Option<String>,
}

#[derive(Clone)]
pub struct ChunkUploadService {
    storage: Arc<dyn Storage>,
    presign_ttl: Duration,
    assembler: Arc<dyn ChunkAssembler>,
}

impl ChunkUploadService {
    pub fn new(storage: Arc<dyn Storage>, presign_ttl: Duration) -> Self {
        Self {
            storage,
            presign_ttl,
            assembler: Arc::new(AcknowledgeOnly),
        }
    }

    /// Replace the finalization strategy.
    pub fn with_assembler(mut self, assembler: Arc<dyn ChunkAssembler>) -> Self {
        self.assembler = assembler;
        self
    }

    /// Issue a short-lived presigned PUT for one chunk key. Nothing is written.
    pub async fn authorize_chunk_write(
        &self,
        session_id: &str,
        index: u64,
    ) -> AppResult<ChunkWriteGrant> {
        let key = chunk_key(session_id, index)?;
        let expires_at = Utc::now() + chrono::Duration::seconds(self.presign_ttl.as_secs() as i64);

        let url = self
            .storage
            .presigned_put_url(&key, DEFAULT_CHUNK_CONTENT_TYPE, self.presign_ttl)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    session_id = %session_id,
                    key = %key,
                    "Failed to sign chunk upload"
                );
                AppError::UpstreamSigning(e.to_string())
            })?;

        tracing::info!(
            session_id = %session_id,
            index = index,
            key = %key,
            ttl_secs = self.presign_ttl.as_secs(),
            "Chunk upload authorized"
        );

        Ok(ChunkWriteGrant {
            url,
            key,
            expires_at,
        })
    }

    /// Write one chunk at its canonical key, replacing any earlier upload of the same index.
    pub async fn ingest_chunk(&self, upload: ChunkUpload) -> AppResult<ChunkWriteReceipt> {
        let key = chunk_key(&upload.session_id, upload.index)?;
        if upload.data.is_empty() {
            return Err(AppError::EmptyFile);
        }

        let content_type = upload
            .content_type
            .as_deref()
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(DEFAULT_CHUNK_CONTENT_TYPE);
        let size = upload.data.len();

        self.storage
            .put_object(&key, upload.data, content_type)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    session_id = %upload.session_id,
                    key = %key,
                    size_bytes = size,
                    "Failed to store chunk"
                );
                AppError::StoreWrite(e.to_string())
            })?;

        tracing::info!(
            session_id = %upload.session_id,
            index = upload.index,
            key = %key,
            size_bytes = size,
            content_type = %content_type,
            "Chunk stored"
        );

        Ok(ChunkWriteReceipt { key })
    }

    /// Mark a session finished. Chunks are not inspected.
    pub async fn finalize(&self, session_id: &str) -> AppResult<FinalizeOutcome> {
        let prefix = chunk_prefix(session_id)?;
        let outcome = self.assembler.assemble(session_id, prefix).await?;

        tracing::info!(
            session_id = %session_id,
            prefix = %outcome.prefix(),
            "Session finalized"
        );

        Ok(outcome)
    }
}
