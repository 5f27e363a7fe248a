//! Mail transport for order notifications via SMTP.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use printdesk_core::{Config, NotificationMessage};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("No valid recipient addresses")]
    NoRecipients,

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// Mail transport the intake pipeline dispatches notifications through.
///
/// A trait seam so the pipeline can be exercised against a recording
/// transport in tests; the process-lifetime implementation is [`SmtpMailer`].
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &NotificationMessage) -> Result<(), MailError>;
}

/// SMTP mail transport (lettre).
#[derive(Clone)]
pub struct SmtpMailer {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Create the SMTP transport from config. Config validation has already
    /// ensured host and sender are present.
    pub fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("SMTP_HOST is not configured"))?;
        let from: Mailbox = config
            .smtp_from
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("SMTP_FROM is not configured"))?
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid SMTP_FROM: {}", e))?;
        let port = config.smtp_port.unwrap_or(587);

        let mailer = if config.smtp_tls {
            let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(port);
            let builder = match (&config.smtp_user, &config.smtp_password) {
                (Some(user), Some(password)) => {
                    builder.credentials(Credentials::new(user.clone(), password.clone()))
                }
                _ => builder,
            };
            tracing::info!(
                host = %host,
                port = port,
                "Mail transport initialized (SMTP with STARTTLS)"
            );
            builder.build()
        } else {
            let builder =
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let builder = match (&config.smtp_user, &config.smtp_password) {
                (Some(user), Some(password)) => {
                    builder.credentials(Credentials::new(user.clone(), password.clone()))
                }
                _ => builder,
            };
            tracing::info!(host = %host, port = port, "Mail transport initialized (SMTP)");
            builder.build()
        };

        Ok(Self {
            mailer: Arc::new(mailer),
            from,
        })
    }

    fn build_message(&self, message: &NotificationMessage) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(message.subject.clone());

        let mut recipients = 0;
        for addr in &message.to {
            match addr.parse::<Mailbox>() {
                Ok(mailbox) => {
                    builder = builder.to(mailbox);
                    recipients += 1;
                }
                Err(e) => {
                    tracing::warn!(address = %addr, error = %e, "Skipping invalid recipient address");
                }
            }
        }
        if recipients == 0 {
            return Err(MailError::NoRecipients);
        }

        if message.attachments.is_empty() {
            return builder
                .header(ContentType::TEXT_PLAIN)
                .body(message.body.clone())
                .map_err(|e| MailError::Build(e.to_string()));
        }

        let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(message.body.clone()));
        for attachment in &message.attachments {
            let content_type = ContentType::parse(&attachment.content_type)
                .unwrap_or(ContentType::parse("application/octet-stream").expect("static mime"));
            parts = parts.singlepart(
                Attachment::new(attachment.filename.clone())
                    .body(attachment.content.to_vec(), content_type),
            );
        }

        builder
            .multipart(parts)
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, message: &NotificationMessage) -> Result<(), MailError> {
        let email = self.build_message(message)?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        info!(
            recipients = message.to.len(),
            attachments = message.attachments.len(),
            subject = %message.subject,
            "Order notification sent"
        );
        Ok(())
    }
}
