//! Direct chunk ingest: the client posts the chunk through the server as multipart.

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::chunks::{ChunkUpload, ChunkUploadService};
use crate::state::UploadLimits;
use crate::utils::upload::{extract_chunk_form, require_multipart};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::HeaderMap,
    Json,
};
use reeldrop_core::models::IngestResponse;
use reeldrop_core::{parse_chunk_index, AppError};
use utoipa::ToSchema;

/// Multipart form accepted by the ingest endpoint (documentation only)
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct ChunkUploadForm {
    /// Session token returned by the start endpoint
    pub session_id: String,
    /// Chunk index (0-based, at most 999999)
    pub idx: String,
    /// Chunk bytes; the part's Content-Type is stored with the object (default video/webm)
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Upload one chunk through the server
#[utoipa::path(
    post,
    path = "/api/v0/chunks",
    tag = "chunks",
    request_body(content = ChunkUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Chunk stored", body = IngestResponse),
        (status = 204, description = "CORS preflight (OPTIONS)"),
        (status = 400, description = "Missing content type, parameter or file, or too many parts", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 413, description = "Chunk exceeds the size limit", body = ErrorResponse),
        (status = 502, description = "Store write failed", body = ErrorResponse)
    )
)]
pub async fn upload_chunk(
    State(chunks): State<ChunkUploadService>,
    State(limits): State<UploadLimits>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<IngestResponse>, HttpAppError> {
    require_multipart(&headers)?;
    let multipart =
        multipart.map_err(|e| AppError::InvalidInput(format!("Invalid multipart: {}", e.body_text())))?;

    let form = extract_chunk_form(multipart, &limits).await?;

    let session_id = form
        .session_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::MissingParameter("sessionId".to_string()))?;
    let index = form
        .idx
        .as_deref()
        .and_then(parse_chunk_index)
        .ok_or_else(|| AppError::MissingParameter("idx".to_string()))?;
    let file = form.file.ok_or(AppError::EmptyFile)?;

    let receipt = chunks
        .ingest_chunk(ChunkUpload {
            session_id,
            index,
            data: file.data,
            content_type: file.content_type,
        })
        .await?;

    Ok(Json(IngestResponse::from(receipt)))
}
