pub mod ingest_cors;
pub mod request_id;
pub mod security_headers;

pub use ingest_cors::ingest_cors_middleware;
pub use request_id::{request_id_middleware, RequestId};
pub use security_headers::{security_headers_middleware, SecurityHeadersConfig};
