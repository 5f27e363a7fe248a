//! Notification composition.
//!
//! Builds the outbound order notification from the form fields and the
//! per-file pipeline outcomes. Composition is pure; dispatching the message
//! is the mail transport's job.

use std::fmt::Write as _;

use bytes::Bytes;

use crate::constants::{ORDER_IMAGE_FIELD, ORDER_IMAGE_FILENAME, UNKNOWN_ORDER_NUMBER};
use crate::models::OrderForm;

/// One inline attachment of the outbound message.
#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: Bytes,
}

/// Result of routing one uploaded file through the pipeline, in original
/// file order.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// Routed inline; content travels with the notification.
    Inline {
        field: String,
        filename: String,
        content_type: String,
        content: Bytes,
    },
    /// Routed to the object store; referenced by a durable public link.
    Linked { filename: String, url: String },
    /// Remote routing failed; recorded so the file is never silently dropped.
    Failed { filename: String, cause: String },
}

impl FileOutcome {
    pub fn link(&self) -> Option<&str> {
        match self {
            FileOutcome::Linked { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<(&str, &str)> {
        match self {
            FileOutcome::Failed { filename, cause } => Some((filename, cause)),
            _ => None,
        }
    }
}

/// The assembled notification: built once, sent once.
#[derive(Debug, Clone)]
pub struct NotificationMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<MailAttachment>,
}

/// Assemble the notification for one order.
///
/// The body always opens with the full serialized form (stable field order)
/// for audit purposes, followed by the download-link section (`None` when
/// empty). Warning blocks for missing files and upload errors appear only
/// when there is something to warn about.
pub fn compose(
    form: &OrderForm,
    outcomes: &[FileOutcome],
    missing: &[String],
    recipients: &[String],
) -> NotificationMessage {
    let subject = format!(
        "New order #{}",
        form.order_number().unwrap_or(UNKNOWN_ORDER_NUMBER)
    );

    let mut body = String::from("Order received:\n");
    for (name, value) in form.iter() {
        let _ = writeln!(body, "{}: {}", name, value);
    }

    body.push_str("\nDownload links for large files:\n");
    let links: Vec<&str> = outcomes.iter().filter_map(FileOutcome::link).collect();
    if links.is_empty() {
        body.push_str("None\n");
    } else {
        for link in links {
            let _ = writeln!(body, "{}", link);
        }
    }

    if !missing.is_empty() {
        body.push_str("\nWarning: files declared but not received:\n");
        for name in missing {
            let _ = writeln!(body, "- {}", name);
        }
    }

    let failures: Vec<(&str, &str)> = outcomes.iter().filter_map(FileOutcome::failure).collect();
    if !failures.is_empty() {
        body.push_str("\nUpload errors:\n");
        for (filename, cause) in failures {
            let _ = writeln!(body, "- {}: {}", filename, cause);
        }
    }

    let attachments = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            FileOutcome::Inline {
                field,
                filename,
                content_type,
                content,
            } => Some(MailAttachment {
                // The dedicated order image always goes out under a fixed
                // name so the recipient can spot it at a glance.
                filename: if field == ORDER_IMAGE_FIELD {
                    ORDER_IMAGE_FILENAME.to_string()
                } else {
                    filename.clone()
                },
                content_type: content_type.clone(),
                content: content.clone(),
            }),
            _ => None,
        })
        .collect();

    NotificationMessage {
        to: recipients.to_vec(),
        subject,
        body,
        attachments,
    }
}
