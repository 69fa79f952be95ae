//! Wire models shared by the API and its clients.

pub mod upload;

pub use upload::{
    ChunkWriteGrant, ChunkWriteReceipt, FinalizeOutcome, FinalizeRequest, FinalizeResponse,
    IngestResponse, SessionCreatedResponse, SignChunkQuery, SignChunkResponse,
};
