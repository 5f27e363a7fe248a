//! Liveness handlers and probe endpoints.

use axum::{http::StatusCode, response::IntoResponse, Json};

/// Liveness probe - process is running and accepting requests.
pub async fn liveness() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Server is running" })),
    )
}

/// Browsers probe for favicons against API hosts; answer quietly.
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
