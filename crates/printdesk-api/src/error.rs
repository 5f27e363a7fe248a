//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`.
//! Use `AppError` for errors and `?` so they become `HttpAppError` and render
//! consistently (status, body, logging).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use printdesk_core::{AppError, ErrorMetadata, LogLevel};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from printdesk-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let err = self.0;

        match err.log_level() {
            LogLevel::Debug => {
                tracing::debug!(error = %err, code = err.error_code(), "Request failed")
            }
            LogLevel::Warn => {
                tracing::warn!(error = %err, code = err.error_code(), "Request failed")
            }
            LogLevel::Error => {
                tracing::error!(error = %err, code = err.error_code(), "Request failed")
            }
        }

        let client_message = err.client_message();
        let full_message = err.to_string();
        let body = ErrorResponse {
            // 5xx details stay in the logs; client errors already carry
            // their own detail in the message.
            details: (err.http_status_code() < 500 && full_message != client_message)
                .then_some(full_message),
            error: client_message,
            code: err.error_code().to_string(),
        };

        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(body)).into_response()
    }
}
