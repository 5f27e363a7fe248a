//! Error types module
//!
//! This module provides the core error types used throughout the Printdesk
//! application. All request-processing errors are unified under the
//! `AppError` enum; each variant self-describes its HTTP presentation
//! through the `ErrorMetadata` trait.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like oversized requests
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "PARSE_FAILURE")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Malformed multipart body: {0}")]
    ParseFailure(String),

    #[error("Invalid order submission: {0}")]
    Validation(String),

    #[error("Request too large: {0}")]
    PayloadTooLarge(String),

    #[error("Notification dispatch failed: {0}")]
    NotificationDispatch(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::ParseFailure(_) | AppError::Validation(_) => 400,
            AppError::PayloadTooLarge(_) => 413,
            AppError::NotificationDispatch(_) | AppError::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::ParseFailure(_) => "PARSE_FAILURE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::NotificationDispatch(_) => "NOTIFICATION_DISPATCH_FAILURE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            // Internal details stay in the logs
            AppError::Internal(_) => "Failed to process order".to_string(),
            AppError::NotificationDispatch(_) => {
                "Failed to send the order notification".to_string()
            }
            other => other.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::ParseFailure(_) | AppError::Validation(_) => LogLevel::Debug,
            AppError::PayloadTooLarge(_) => LogLevel::Warn,
            AppError::NotificationDispatch(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
