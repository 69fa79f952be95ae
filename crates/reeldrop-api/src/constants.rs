//! API constants
//!
//! Handler path annotations for OpenAPI repeat these literals; keep them in sync.

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Current API version segment
pub const API_VERSION: &str = "v0";

/// Allocate a session
pub const SESSIONS_START_PATH: &str = "/sessions/start";

/// Finalize a session
pub const SESSIONS_FINALIZE_PATH: &str = "/sessions/finalize";

/// Request a presigned chunk upload
pub const CHUNKS_SIGN_PATH: &str = "/chunks/sign";

/// Ingest a chunk through the server
pub const CHUNKS_PATH: &str = "/chunks";

/// Largest accepted text field in an ingest form
pub const MAX_FORM_FIELD_BYTES: usize = 4 * 1024;

/// Allowance on top of the chunk cap for multipart framing and text fields
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Versioned path for a route suffix, e.g. `/chunks` -> `/api/v0/chunks`
pub fn api_path(path: &str) -> String {
    format!("{}/{}{}", API_BASE, API_VERSION, path)
}

/// Path of the served OpenAPI document
pub fn openapi_path() -> String {
    format!("{}/openapi.json", API_BASE)
}
