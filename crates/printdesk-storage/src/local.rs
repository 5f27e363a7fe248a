use crate::traits::{ObjectStorage, StorageError, StorageResult, UploadSource};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation, used for development and tests.
///
/// Files under the base path are assumed to be served publicly by something
/// else (a static file server or reverse proxy), so `grant_public_read` has
/// nothing to do here.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage
    /// * `base_url` - Base URL the stored files are served under
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path, rejecting keys that would
    /// escape the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put(
        &self,
        key: &str,
        _content_type: &str,
        source: UploadSource,
    ) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let size = match source {
            UploadSource::Memory(bytes) => {
                let size = bytes.len() as u64;
                let mut file = fs::File::create(&path).await.map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                file.write_all(&bytes).await.map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "Failed to write file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                file.sync_all().await.map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "Failed to sync file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                size
            }
            UploadSource::File(source_path) => {
                fs::copy(&source_path, &path).await.map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "Failed to copy {} to {}: {}",
                        source_path.display(),
                        path.display(),
                        e
                    ))
                })?
            }
        };

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(())
    }

    async fn grant_public_read(&self, key: &str) -> StorageResult<()> {
        tracing::debug!(key = %key, "Local storage has no ACLs; public-read grant is a no-op");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        let encoded = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", self.base_url.trim_end_matches('/'), encoded)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    async fn test_storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = LocalStorage::new(dir.path(), "http://localhost:10000/files".to_string())
            .await
            .expect("local storage");
        (dir, storage)
    }

    #[tokio::test]
    async fn put_writes_memory_content_under_the_key() {
        let (dir, storage) = test_storage().await;

        storage
            .put(
                "orders/abc/flyer.pdf",
                "application/pdf",
                UploadSource::Memory(Bytes::from_static(b"%PDF-1.4")),
            )
            .await
            .expect("put");

        let written = std::fs::read(dir.path().join("orders/abc/flyer.pdf")).expect("read back");
        assert_eq!(written, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn put_copies_file_content() {
        let (dir, storage) = test_storage().await;

        let source = tempfile::NamedTempFile::new().expect("temp file");
        std::fs::write(source.path(), b"spooled payload").expect("write source");

        storage
            .put(
                "orders/abc/big.psd",
                "image/x-psd",
                UploadSource::File(source.path().to_path_buf()),
            )
            .await
            .expect("put");

        let written = std::fs::read(dir.path().join("orders/abc/big.psd")).expect("read back");
        assert_eq!(written, b"spooled payload");
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let (_dir, storage) = test_storage().await;

        let result = storage
            .put(
                "../escape.txt",
                "text/plain",
                UploadSource::Memory(Bytes::from_static(b"nope")),
            )
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage
            .put(
                "/absolute.txt",
                "text/plain",
                UploadSource::Memory(Bytes::from_static(b"nope")),
            )
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn public_url_joins_base_url_and_encoded_key() {
        let (_dir, storage) = test_storage().await;
        assert_eq!(
            storage.public_url("orders/abc/flyer.pdf"),
            "http://localhost:10000/files/orders/abc/flyer.pdf"
        );
    }
}
