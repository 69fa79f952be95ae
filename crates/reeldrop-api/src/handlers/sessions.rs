//! Session lifecycle handlers: allocation and finalization.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use reeldrop_core::models::{FinalizeRequest, FinalizeResponse, SessionCreatedResponse};
use reeldrop_core::AppError;
use std::sync::Arc;

/// Allocate a new upload session
///
/// Mints an unpredictable token. Nothing is stored; the session exists only through the
/// chunks later written under its prefix.
#[utoipa::path(
    get,
    path = "/api/v0/sessions/start",
    tag = "sessions",
    responses(
        (status = 200, description = "Session allocated", body = SessionCreatedResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Randomness unavailable", body = ErrorResponse)
    )
)]
pub async fn start_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionCreatedResponse>, HttpAppError> {
    let session_id = state.session_ids.new_session_id()?;

    tracing::info!(
        session_id = %session_id,
        source = %state.session_ids,
        "Session allocated"
    );

    Ok(Json(SessionCreatedResponse {
        ok: true,
        session_id,
    }))
}

/// Finalize an upload session
///
/// Acknowledges the session and returns the prefix its chunks live under. Chunks are
/// neither verified nor merged.
#[utoipa::path(
    post,
    path = "/api/v0/sessions/finalize",
    tag = "sessions",
    request_body = FinalizeRequest,
    responses(
        (status = 200, description = "Session finalized", body = FinalizeResponse),
        (status = 400, description = "Missing or invalid sessionId", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn finalize_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FinalizeRequest>, JsonRejection>,
) -> Result<Json<FinalizeResponse>, HttpAppError> {
    let Json(request) = payload?;
    let session_id = request
        .session_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::MissingParameter("sessionId".to_string()))?;

    let outcome = state.chunks.finalize(&session_id).await?;

    Ok(Json(FinalizeResponse::from(outcome)))
}
