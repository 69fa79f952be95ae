//! Canonical object keys for session chunks.
//!
//! Key format: `sessions/{session_id}/chunks/{index:06}.webm`.
//!
//! The index is zero-padded so that lexicographic key order equals numeric index order.
//! That only holds while the index fits in six digits, so larger indices are rejected
//! rather than silently producing keys that sort out of order.

use crate::constants::{
    CHUNK_EXTENSION, CHUNK_INDEX_WIDTH, MAX_CHUNK_INDEX, MAX_SESSION_ID_LEN, SESSIONS_PREFIX,
};
use thiserror::Error;

/// Errors produced when key inputs violate the addressing scheme.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("sessionId must not be empty")]
    EmptySessionId,

    #[error("sessionId must be at most {max} bytes (got {len})")]
    SessionIdTooLong { len: usize, max: usize },

    #[error("sessionId contains characters that are not allowed in a storage key")]
    InvalidSessionId,

    #[error("chunk index {0} exceeds the maximum of 999999")]
    IndexOutOfRange(u64),
}

fn validate_session_id(session_id: &str) -> Result<(), KeyError> {
    if session_id.is_empty() {
        return Err(KeyError::EmptySessionId);
    }
    if session_id.len() > MAX_SESSION_ID_LEN {
        return Err(KeyError::SessionIdTooLong {
            len: session_id.len(),
            max: MAX_SESSION_ID_LEN,
        });
    }
    // Store clients percent-encode anything outside this set, which would move the
    // object away from the key reported to the client.
    if !session_id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(KeyError::InvalidSessionId);
    }
    Ok(())
}

/// Prefix under which every chunk of a session is stored, with trailing slash.
pub fn chunk_prefix(session_id: &str) -> Result<String, KeyError> {
    validate_session_id(session_id)?;
    Ok(format!("{}/{}/chunks/", SESSIONS_PREFIX, session_id))
}

/// Canonical storage key for chunk `index` of `session_id`.
pub fn chunk_key(session_id: &str, index: u64) -> Result<String, KeyError> {
    if index > MAX_CHUNK_INDEX {
        return Err(KeyError::IndexOutOfRange(index));
    }
    let prefix = chunk_prefix(session_id)?;
    Ok(format!(
        "{}{:0width$}.{}",
        prefix,
        index,
        CHUNK_EXTENSION,
        width = CHUNK_INDEX_WIDTH
    ))
}

/// Parse a client-supplied chunk index.
///
/// Accepts decimal digits only, surrounding whitespace ignored, leading zeros allowed.
/// Returns `None` for anything that is not a non-negative integer.
pub fn parse_chunk_index(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}
