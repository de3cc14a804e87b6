//! Error types module
//!
//! This module provides the core error types used throughout the Snapqa
//! application. All errors are unified under the `AppError` enum, which
//! covers upload rejections, upstream inference failures, database errors,
//! and internal failures.

use std::io;

use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UNSUPPORTED_FORMAT")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether diagnostic details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Upstream inference call failed: {message}")]
    UpstreamTransport { message: String, details: String },

    #[error("Upstream response envelope not parseable: {0}")]
    InvalidUpstreamEnvelope(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

// Error conversion implementations
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
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

/// Static metadata per variant: (http_status, error_code, recoverable, sensitive, log_level).
/// Reduces duplication in the ErrorMetadata impl; client_message stays per-variant for
/// dynamic content.
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::Database(_) => (500, "DATABASE_ERROR", true, true, LogLevel::Error),
        AppError::NoFileUploaded => (400, "NO_FILE_UPLOADED", false, false, LogLevel::Debug),
        AppError::UnsupportedFormat(_) => {
            (400, "UNSUPPORTED_FORMAT", false, false, LogLevel::Debug)
        }
        AppError::PayloadTooLarge(_) => (400, "PAYLOAD_TOO_LARGE", false, false, LogLevel::Debug),
        AppError::MalformedEncoding(_) => {
            (400, "MALFORMED_ENCODING", false, false, LogLevel::Debug)
        }
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, false, LogLevel::Debug),
        AppError::ImageProcessing(_) => {
            (400, "IMAGE_PROCESSING_ERROR", false, false, LogLevel::Warn)
        }
        AppError::UpstreamTransport { .. } => {
            (502, "UPSTREAM_TRANSPORT_ERROR", true, false, LogLevel::Error)
        }
        AppError::InvalidUpstreamEnvelope(_) => {
            (502, "INVALID_UPSTREAM_ENVELOPE", false, false, LogLevel::Error)
        }
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::NoFileUploaded => "NoFileUploaded",
            AppError::UnsupportedFormat(_) => "UnsupportedFormat",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::MalformedEncoding(_) => "MalformedEncoding",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::ImageProcessing(_) => "ImageProcessing",
            AppError::UpstreamTransport { .. } => "UpstreamTransport",
            AppError::InvalidUpstreamEnvelope(_) => "InvalidUpstreamEnvelope",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including the error chain and any
    /// upstream diagnostic text.
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        if let AppError::UpstreamTransport { details: diag, .. } = self {
            if !diag.is_empty() {
                details.push_str(&format!("\n  Upstream said: {}", diag));
            }
        }

        // Add source error chain
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

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::NoFileUploaded => "No file uploaded".to_string(),
            AppError::UnsupportedFormat(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::MalformedEncoding(ref msg) => msg.clone(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::ImageProcessing(ref msg) => msg.clone(),
            AppError::UpstreamTransport { ref message, .. } => message.clone(),
            AppError::InvalidUpstreamEnvelope(ref msg) => {
                format!("Upstream response not parseable: {}", msg)
            }
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
