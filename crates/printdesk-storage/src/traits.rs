//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends
//! must implement. The remote contract is deliberately two calls: creating
//! the object and granting anonymous read are separate operations, and an
//! upload only counts as successful when both succeed.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use printdesk_core::StorageBackend;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Granting public read failed: {0}")]
    PermissionFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte source for one upload.
///
/// Small attachments arrive as an in-memory buffer; spooled attachments are
/// streamed from their temp file so multi-gigabyte uploads are never
/// buffered twice.
#[derive(Debug)]
pub enum UploadSource {
    Memory(Bytes),
    File(PathBuf),
}

/// Object-store abstraction.
///
/// Backends are constructed once at startup and shared read-only across
/// requests. Every method is a single attempt; retry policy belongs to the
/// caller (and the observed deployments do not retry).
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Create one object under `key`.
    async fn put(&self, key: &str, content_type: &str, source: UploadSource)
        -> StorageResult<()>;

    /// Grant anonymous read access to an existing object.
    async fn grant_public_read(&self, key: &str) -> StorageResult<()>;

    /// Durable, unauthenticated download URL for an object.
    fn public_url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
