pub mod chunk_sign;
pub mod chunk_upload;
pub mod fallback;
pub mod health;
pub mod sessions;
