//! Reeldrop Storage Library
//!
//! This crate provides the storage abstraction chunk writes go through, with an
//! S3-compatible implementation (AWS S3, Cloudflare R2, MinIO) and a local filesystem
//! implementation for development.
//!
//! Backends never decide where a chunk lives: callers pass the canonical key produced by
//! `reeldrop_core::keys`. Keys must not contain `..` or a leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use reeldrop_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
