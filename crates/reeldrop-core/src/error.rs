//! Error types module
//!
//! All request-level failures of the upload protocol are unified under [`AppError`].
//! Each variant self-describes how it is presented over HTTP through [`ErrorMetadata`],
//! so handlers only ever return `AppError` and the API layer renders it consistently.

use std::io;

use crate::keys::KeyError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for client mistakes worth noticing
    Warn,
    /// Error level - for collaborator and internal failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "MISSING_PARAMETER")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Missing content type: expected multipart/form-data")]
    MissingContentType,

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Too many parts: {0}")]
    TooManyParts(String),

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream signing error: {0}")]
    UpstreamSigning(String),

    #[error("Store write error: {0}")]
    StoreWrite(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience alias used by services and handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<KeyError> for AppError {
    fn from(err: KeyError) -> Self {
        AppError::InvalidArgument(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::MethodNotAllowed(_) => (
            405,
            "METHOD_NOT_ALLOWED",
            false,
            Some("Use the HTTP method documented for this endpoint"),
            false,
            LogLevel::Debug,
        ),
        AppError::MissingContentType => (
            400,
            "MISSING_CONTENT_TYPE",
            false,
            Some("Send the chunk as multipart/form-data"),
            false,
            LogLevel::Debug,
        ),
        AppError::MissingParameter(_) => (
            400,
            "MISSING_PARAMETER",
            false,
            Some("Provide sessionId and a non-negative integer idx"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Split the recording into smaller chunks"),
            false,
            LogLevel::Debug,
        ),
        AppError::TooManyParts(_) => (
            400,
            "TOO_MANY_PARTS",
            false,
            Some("Send exactly one file part and only the documented fields"),
            false,
            LogLevel::Debug,
        ),
        AppError::EmptyFile => (
            400,
            "EMPTY_FILE",
            false,
            Some("Attach a non-empty chunk"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidArgument(_) => (
            400,
            "INVALID_ARGUMENT",
            false,
            Some("Check sessionId and idx against the documented limits"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request format and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::UpstreamSigning(_) => (
            502,
            "UPSTREAM_SIGNING_ERROR",
            true,
            Some("Retry after a short delay or use direct upload"),
            false,
            LogLevel::Error,
        ),
        AppError::StoreWrite(_) => (
            502,
            "STORE_WRITE_ERROR",
            true,
            Some("Retry the chunk upload after a short delay"),
            false,
            LogLevel::Error,
        ),
        AppError::Configuration(_) => (
            500,
            "CONFIGURATION_ERROR",
            false,
            Some("Contact the operator of this service"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MethodNotAllowed(_) => "MethodNotAllowed",
            AppError::MissingContentType => "MissingContentType",
            AppError::MissingParameter(_) => "MissingParameter",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::TooManyParts(_) => "TooManyParts",
            AppError::EmptyFile => "EmptyFile",
            AppError::InvalidArgument(_) => "InvalidArgument",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::UpstreamSigning(_) => "UpstreamSigningError",
            AppError::StoreWrite(_) => "StoreWriteError",
            AppError::Configuration(_) => "ConfigurationError",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MethodNotAllowed(ref method) => {
                format!("Method Not Allowed: {}", method)
            }
            AppError::MissingContentType => {
                "Missing Content-Type header; expected multipart/form-data".to_string()
            }
            AppError::MissingParameter(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::TooManyParts(ref msg) => msg.clone(),
            AppError::EmptyFile => "Missing file".to_string(),
            AppError::InvalidArgument(ref msg) => msg.clone(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::UpstreamSigning(_) => "Failed to sign chunk upload".to_string(),
            AppError::StoreWrite(_) => "Failed to write chunk to storage".to_string(),
            AppError::Configuration(_) => "Service is misconfigured".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
