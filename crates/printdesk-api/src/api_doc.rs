//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Printdesk API",
        version = "0.1.0",
        description = "Print-shop order intake API. Accepts multipart order submissions, offloads large attachments to object storage, and emails the shop a notification with inline attachments and download links."
    ),
    paths(handlers::orders::send_order),
    components(schemas(handlers::orders::OrderAccepted, error::ErrorResponse)),
    tags(
        (name = "orders", description = "Order intake")
    )
)]
pub struct ApiDoc;
