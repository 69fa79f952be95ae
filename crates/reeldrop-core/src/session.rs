//! Session identifier allocation.
//!
//! A session exists only as the set of objects under its key prefix, so allocating one
//! is nothing more than minting an unpredictable token. Nothing is recorded; uniqueness
//! is probabilistic.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng, TryRngCore};

use crate::error::{AppError, AppResult};

static DEGRADED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Randomness source used to mint session identifiers.
///
/// Chosen once at startup and shared by every request handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionIdSource {
    /// OS-backed cryptographically strong randomness; tokens are v4 UUIDs.
    Secure,
    /// Clock plus seeded PRNG; tokens look like `sess_<millis>_<hex>`.
    /// Only used when the OS RNG is unavailable.
    Degraded,
}

impl SessionIdSource {
    /// Probe the OS RNG and pick the strongest variant available.
    pub fn detect() -> Self {
        let mut probe = [0u8; 16];
        match OsRng.try_fill_bytes(&mut probe) {
            Ok(()) => SessionIdSource::Secure,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "OS random source unavailable, falling back to degraded session ids"
                );
                SessionIdSource::Degraded
            }
        }
    }

    /// Mint a new session identifier.
    pub fn new_session_id(&self) -> AppResult<String> {
        match self {
            SessionIdSource::Secure => {
                let mut bytes = [0u8; 16];
                OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
                    AppError::Internal(format!("OS random source failed: {}", e))
                })?;
                Ok(uuid::Builder::from_random_bytes(bytes)
                    .into_uuid()
                    .to_string())
            }
            SessionIdSource::Degraded => Ok(degraded_session_id()),
        }
    }
}

fn degraded_session_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let counter = DEGRADED_COUNTER.fetch_add(1, Ordering::Relaxed);
    let seed = (now.as_nanos() as u64) ^ counter.rotate_left(32);
    let mut rng = StdRng::seed_from_u64(seed);
    let suffix: u64 = rng.random();
    format!("sess_{}_{:016x}", now.as_millis(), suffix)
}

impl FromStr for SessionIdSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(SessionIdSource::detect()),
            "secure" => Ok(SessionIdSource::Secure),
            "degraded" => Ok(SessionIdSource::Degraded),
            _ => Err(anyhow::anyhow!("Invalid session id source: {}", s)),
        }
    }
}

impl Display for SessionIdSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SessionIdSource::Secure => write!(f, "secure"),
            SessionIdSource::Degraded => write!(f, "degraded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::chunk_prefix;
    use std::collections::HashSet;
    use uuid::Uuid;

    const N: usize = 10_000;

    fn assert_distinct(source: SessionIdSource) {
        let mut seen = HashSet::with_capacity(N);
        for _ in 0..N {
            let id = source.new_session_id().unwrap();
            assert!(seen.insert(id.clone()), "duplicate session id {}", id);
        }
        assert_eq!(seen.len(), N);
    }

    #[test]
    fn test_secure_ids_are_distinct() {
        assert_distinct(SessionIdSource::Secure);
    }

    #[test]
    fn test_degraded_ids_are_distinct() {
        assert_distinct(SessionIdSource::Degraded);
    }

    #[test]
    fn test_secure_ids_are_v4_uuids() {
        let id = SessionIdSource::Secure.new_session_id().unwrap();
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_degraded_id_shape() {
        let id = SessionIdSource::Degraded.new_session_id().unwrap();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "sess");
        assert!(parts[1].parse::<u128>().is_ok());
        assert_eq!(parts[2].len(), 16);
        assert!(Uuid::parse_str(&id).is_err());
    }

    #[test]
    fn test_ids_are_valid_key_components() {
        for source in [SessionIdSource::Secure, SessionIdSource::Degraded] {
            let id = source.new_session_id().unwrap();
            assert!(chunk_prefix(&id).is_ok());
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "secure".parse::<SessionIdSource>().unwrap(),
            SessionIdSource::Secure
        );
        assert_eq!(
            "DEGRADED".parse::<SessionIdSource>().unwrap(),
            SessionIdSource::Degraded
        );
        assert!("auto".parse::<SessionIdSource>().is_ok());
        assert!("weak".parse::<SessionIdSource>().is_err());
    }
}
