//! Configuration module
//!
//! This module provides the service configuration, loaded from environment
//! variables at startup and validated before anything else is constructed.

use std::env;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_INLINE_SIZE_LIMIT_BYTES, DEFAULT_MAX_UPLOAD_SIZE_BYTES, DEFAULT_SERVER_PORT,
    DEFAULT_STORAGE_PREFIX,
};
use crate::storage_types::StorageBackend;

/// Application configuration.
///
/// Read-only after process start; the handler and its collaborators only
/// ever borrow from it.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    pub aws_region: Option<String>,
    pub storage_prefix: String,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Intake configuration
    pub inline_size_limit_bytes: u64,
    pub max_upload_size_bytes: usize,
    pub require_files: bool,
    // Mail configuration
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
    pub order_recipients: Vec<String>,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_SERVER_PORT),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            storage_backend: env::var("STORAGE_BACKEND")
                .ok()
                .map(|s| StorageBackend::from_str(&s))
                .transpose()?
                .unwrap_or(StorageBackend::S3),
            s3_bucket: env::var("S3_BUCKET").ok().filter(|s| !s.is_empty()),
            s3_region: env::var("S3_REGION").ok().filter(|s| !s.is_empty()),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            aws_region: env::var("AWS_REGION").ok().filter(|s| !s.is_empty()),
            storage_prefix: env::var("STORAGE_PREFIX")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_STORAGE_PREFIX.to_string()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok().filter(|s| !s.is_empty()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            inline_size_limit_bytes: env::var("INLINE_SIZE_LIMIT_BYTES")
                .unwrap_or_else(|_| DEFAULT_INLINE_SIZE_LIMIT_BYTES.to_string())
                .parse()
                .unwrap_or(DEFAULT_INLINE_SIZE_LIMIT_BYTES),
            max_upload_size_bytes: env::var("MAX_UPLOAD_SIZE_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_SIZE_BYTES.to_string())
                .parse()
                .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE_BYTES),
            require_files: env::var("REQUIRE_FILES")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(false),
            smtp_host: env::var("SMTP_HOST").ok().filter(|s| !s.is_empty()),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&p| p > 0),
            smtp_user: env::var("SMTP_USER").ok().filter(|s| !s.is_empty()),
            smtp_password: env::var("SMTP_PASSWORD").ok().filter(|s| !s.is_empty()),
            smtp_from: env::var("SMTP_FROM").ok().filter(|s| !s.is_empty()),
            smtp_tls: env::var("SMTP_TLS")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
            order_recipients: env::var("ORDER_RECIPIENTS")
                .unwrap_or_default()
                .split(',')
                .map(|addr| addr.trim().to_string())
                .filter(|addr| !addr.is_empty())
                .collect(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.smtp_host.is_none() || self.smtp_from.is_none() {
            return Err(anyhow::anyhow!(
                "SMTP_HOST and SMTP_FROM must be set; orders cannot be accepted without a mail transport"
            ));
        }

        if self.order_recipients.is_empty() {
            return Err(anyhow::anyhow!(
                "ORDER_RECIPIENTS must list at least one notification address"
            ));
        }

        if self.inline_size_limit_bytes as usize > self.max_upload_size_bytes {
            return Err(anyhow::anyhow!(
                "INLINE_SIZE_LIMIT_BYTES ({}) exceeds MAX_UPLOAD_SIZE_BYTES ({})",
                self.inline_size_limit_bytes,
                self.max_upload_size_bytes
            ));
        }

        // Validate storage backend configuration
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
