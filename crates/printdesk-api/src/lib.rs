//! Printdesk API Library
//!
//! This crate provides the HTTP handlers, the order-intake pipeline, the
//! mail transport, and application setup.

// Module declarations
mod api_doc;
mod multipart;
mod telemetry;

// Public modules
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
pub use services::email::{MailError, MailTransport, SmtpMailer};
pub use services::intake::{IntakeReport, OrderIntake};
