//! Printdesk Core Library
//!
//! This crate provides the domain models, order-intake decision logic,
//! configuration, and error types shared across all Printdesk components.

pub mod config;
pub mod constants;
pub mod error;
pub mod filename;
pub mod models;
pub mod notify;
pub mod reconcile;
pub mod routing;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use filename::{normalize_filename, sanitize_filename};
pub use models::{FileContent, OrderForm, UploadedFile};
pub use notify::{FileOutcome, MailAttachment, NotificationMessage};
pub use routing::AttachmentRoute;
pub use storage_types::StorageBackend;
