//! Well-known multipart field names, notification literals, and default limits.

/// Form field carrying the order number used in the notification subject.
pub const ORDER_NUMBER_FIELD: &str = "orderNumber";

/// Form field carrying the client's declared attachment list (`", "`-separated).
pub const DECLARED_FILES_FIELD: &str = "filename";

/// File field carrying the rendered order image.
pub const ORDER_IMAGE_FIELD: &str = "orderImage";

/// Fixed attachment name the order image is delivered under.
pub const ORDER_IMAGE_FILENAME: &str = "order.png";

/// Placeholder clients send when no attachment list was filled in.
/// Filtered out before reconciliation.
pub const UNSPECIFIED_SENTINEL: &str = "Not specified";

/// Subject placeholder when the form carries no order number.
pub const UNKNOWN_ORDER_NUMBER: &str = "Unknown";

/// Default inline-vs-remote routing threshold (1 MiB).
pub const DEFAULT_INLINE_SIZE_LIMIT_BYTES: u64 = 1024 * 1024;

/// Default cap on the whole multipart request body (100 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE_BYTES: usize = 100 * 1024 * 1024;

/// Default object-store prefix orders are filed under.
pub const DEFAULT_STORAGE_PREFIX: &str = "orders";

/// Default HTTP port.
pub const DEFAULT_SERVER_PORT: u16 = 10000;
