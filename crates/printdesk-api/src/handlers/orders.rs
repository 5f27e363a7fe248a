//! Order intake endpoint.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::multipart::read_order_submission;
use crate::state::AppState;

/// Success payload for one accepted order.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderAccepted {
    pub message: String,
    /// Echo of the submitted form fields.
    pub order: serde_json::Value,
    /// Public download links for attachments routed to the object store.
    pub file_links: Vec<String>,
    /// Per-file upload failures; present but empty on full success.
    pub upload_errors: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/send-order",
    tag = "orders",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Order accepted and notification sent", body = OrderAccepted),
        (status = 400, description = "Malformed submission or missing required files", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 500, description = "Processing or notification dispatch failure", body = ErrorResponse)
    )
)]
pub async fn send_order(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<OrderAccepted>, HttpAppError> {
    let submission =
        read_order_submission(multipart, state.config.inline_size_limit_bytes).await?;

    tracing::info!(
        order_number = submission.form.order_number().unwrap_or("-"),
        fields = submission.form.iter().count(),
        files = submission.files.len(),
        "Received order submission"
    );

    let report = state
        .intake
        .process(&submission.form, submission.files)
        .await?;

    Ok(Json(OrderAccepted {
        message: "Order created, files processed, and email sent successfully".to_string(),
        order: submission.form.to_json(),
        file_links: report.file_links,
        upload_errors: report.upload_errors,
    }))
}
