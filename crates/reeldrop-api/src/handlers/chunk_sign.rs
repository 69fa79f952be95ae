use crate::error::{ErrorResponse, HttpAppError};
use crate::services::chunks::ChunkUploadService;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use reeldrop_core::models::{SignChunkQuery, SignChunkResponse};
use reeldrop_core::{parse_chunk_index, AppError};

/// Request a presigned URL for uploading one chunk directly to the store
///
/// The URL accepts a single HTTP PUT of the chunk bytes until `expiresAt`. Issuing it
/// writes nothing.
#[utoipa::path(
    get,
    path = "/api/v0/chunks/sign",
    tag = "chunks",
    params(SignChunkQuery),
    responses(
        (status = 200, description = "Presigned URL issued", body = SignChunkResponse),
        (status = 400, description = "Missing or invalid sessionId/idx", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 502, description = "Store could not sign the upload", body = ErrorResponse)
    )
)]
pub async fn sign_chunk(
    State(chunks): State<ChunkUploadService>,
    query: Result<Query<SignChunkQuery>, QueryRejection>,
) -> Result<Json<SignChunkResponse>, HttpAppError> {
    let Query(query) = query?;

    let session_id = query
        .session_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::MissingParameter("sessionId".to_string()))?;
    let index = query
        .idx
        .as_deref()
        .and_then(parse_chunk_index)
        .ok_or_else(|| AppError::MissingParameter("idx".to_string()))?;

    let grant = chunks.authorize_chunk_write(&session_id, index).await?;

    Ok(Json(SignChunkResponse::from(grant)))
}
