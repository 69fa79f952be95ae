//! OpenAPI documentation.
//! Handler path annotations repeat the `/api/v0` prefix built by `crate::constants::api_path`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use reeldrop_core::models;

/// Returns the OpenAPI document served at `crate::constants::openapi_path()`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reeldrop API",
        version = "0.1.0",
        description = "Chunked upload sessions for browser media recordings (v0). Clients allocate a session, upload numbered chunks either through presigned URLs or through the server, then finalize. Chunks are stored at sessions/{sessionId}/chunks/{index:06}.webm."
    ),
    paths(
        // Sessions
        handlers::sessions::start_session,
        handlers::sessions::finalize_session,
        // Chunks
        handlers::chunk_sign::sign_chunk,
        handlers::chunk_upload::upload_chunk,
        // Health
        handlers::health::liveness_check,
    ),
    components(
        schemas(
            models::SessionCreatedResponse,
            models::SignChunkResponse,
            models::IngestResponse,
            models::FinalizeRequest,
            models::FinalizeResponse,
            handlers::chunk_upload::ChunkUploadForm,
            handlers::health::LivenessResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "sessions", description = "Session allocation and finalization"),
        (name = "chunks", description = "Presigned and server-mediated chunk uploads"),
        (name = "health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;
