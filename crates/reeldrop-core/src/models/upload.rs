use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::constants::FINALIZE_MESSAGE;

/// Response for a freshly allocated session
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedResponse {
    pub ok: bool,
    /// Opaque session token to use for every chunk of this recording
    pub session_id: String,
}

/// Query parameters for requesting a presigned chunk upload
///
/// Both fields are optional at the type level so that absence is reported as a
/// missing parameter rather than a generic query rejection.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SignChunkQuery {
    /// Session token returned by the start endpoint
    pub session_id: Option<String>,
    /// Chunk index (0-based, at most 999999)
    #[serde(alias = "index")]
    pub idx: Option<String>,
}

/// A time-scoped credential authorizing one PUT of one chunk key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkWriteGrant {
    pub url: String,
    pub key: String,
    pub expires_at: DateTime<Utc>,
}

/// Response carrying a presigned chunk upload URL
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignChunkResponse {
    pub ok: bool,
    /// Presigned URL; upload the chunk with HTTP PUT before it expires
    pub url: String,
    /// Canonical storage key the URL writes to
    pub key: String,
    /// When the URL stops being accepted by the store
    pub expires_at: DateTime<Utc>,
}

impl From<ChunkWriteGrant> for SignChunkResponse {
    fn from(grant: ChunkWriteGrant) -> Self {
        Self {
            ok: true,
            url: grant.url,
            key: grant.key,
            expires_at: grant.expires_at,
        }
    }
}

/// Result of a server-mediated chunk write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkWriteReceipt {
    pub key: String,
}

/// Response for a directly ingested chunk
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngestResponse {
    pub ok: bool,
    /// Canonical storage key the chunk was written to
    pub key: String,
}

impl From<ChunkWriteReceipt> for IngestResponse {
    fn from(receipt: ChunkWriteReceipt) -> Self {
        Self {
            ok: true,
            key: receipt.key,
        }
    }
}

/// Request to finalize a session
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    pub session_id: Option<String>,
}

/// What finalization produced.
///
/// Today chunks are left in place and only acknowledged. An assembled-object variant
/// can be added without changing the finalize contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// Chunks stay under `prefix` for a downstream consumer to enumerate.
    Acknowledged { prefix: String },
}

impl FinalizeOutcome {
    pub fn prefix(&self) -> &str {
        match self {
            FinalizeOutcome::Acknowledged { prefix } => prefix,
        }
    }
}

/// Response for a finalized session
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FinalizeResponse {
    pub ok: bool,
    pub message: String,
    /// Prefix under which the session's chunks are stored
    pub prefix: String,
}

impl From<FinalizeOutcome> for FinalizeResponse {
    fn from(outcome: FinalizeOutcome) -> Self {
        match outcome {
            FinalizeOutcome::Acknowledged { prefix } => Self {
                ok: true,
                message: FINALIZE_MESSAGE.to_string(),
                prefix,
            },
        }
    }
}
