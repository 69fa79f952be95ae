//! Reeldrop API Library
//!
//! This crate provides the HTTP surface of the chunked upload protocol: handlers,
//! middleware, the chunk upload service and application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::chunks::{AcknowledgeOnly, ChunkAssembler, ChunkUpload, ChunkUploadService};
pub use state::{AppState, UploadLimits};
