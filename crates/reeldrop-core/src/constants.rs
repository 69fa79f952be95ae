//! Protocol constants.

/// Root prefix under which every session's objects live.
pub const SESSIONS_PREFIX: &str = "sessions";

/// Width of the zero-padded chunk index in object keys.
pub const CHUNK_INDEX_WIDTH: usize = 6;

/// Largest index that still fits in [`CHUNK_INDEX_WIDTH`] digits.
/// Keys sort lexicographically in index order only up to this value.
pub const MAX_CHUNK_INDEX: u64 = 999_999;

/// File extension of stored chunks.
pub const CHUNK_EXTENSION: &str = "webm";

/// Content type recorded for chunks whose upload does not declare one.
pub const DEFAULT_CHUNK_CONTENT_TYPE: &str = "video/webm";

/// Upper bound on the length of a session identifier.
pub const MAX_SESSION_ID_LEN: usize = 128;

/// Message returned by a successful finalize.
pub const FINALIZE_MESSAGE: &str = "Finalized (chunks are stored).";
