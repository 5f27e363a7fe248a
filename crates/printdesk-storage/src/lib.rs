//! Printdesk Storage Library
//!
//! This crate provides the object-store abstraction the order-intake
//! pipeline pushes large attachments through, with S3 and local-filesystem
//! implementations.
//!
//! # Key format
//!
//! Objects are filed under `{prefix}/{uuid}/{filename}`: the configured
//! destination prefix, a per-upload uuid segment (orders routinely reuse
//! filenames), and the normalized original filename. Key generation is
//! centralized in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::object_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use printdesk_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult, UploadSource};
