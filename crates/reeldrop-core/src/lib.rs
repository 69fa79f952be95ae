//! Reeldrop Core Library
//!
//! This crate provides the chunk addressing scheme, session identifiers, error types,
//! configuration and wire models shared across all Reeldrop components.

pub mod config;
pub mod constants;
pub mod error;
pub mod keys;
pub mod models;
pub mod session;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, StoreCredentials};
pub use error::{AppError, AppResult, ErrorMetadata, LogLevel};
pub use keys::{chunk_key, chunk_prefix, parse_chunk_index, KeyError};
pub use session::SessionIdSource;
pub use storage_types::StorageBackend;
