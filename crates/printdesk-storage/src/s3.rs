use crate::traits::{ObjectStorage, StorageError, StorageResult, UploadSource};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO, "https://nyc3.digitaloceanspaces.com" for DigitalOcean Spaces)
    ///
    /// Credentials come from the ambient AWS configuration chain (env vars,
    /// profile, instance metadata), refreshed transparently by the SDK.
    pub async fn new(bucket: String, region: String, endpoint_url: Option<String>) -> Self {
        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(ref endpoint) = endpoint_url {
            // S3-compatible providers are addressed path-style
            builder = builder.endpoint_url(endpoint.clone()).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        S3Storage {
            client,
            bucket,
            region,
            endpoint_url,
        }
    }

    /// URL-encode each key segment while keeping the `/` separators.
    fn encode_key(key: &str) -> String {
        key.split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        source: UploadSource,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();

        let (body, size) = match source {
            UploadSource::Memory(bytes) => {
                let size = bytes.len() as u64;
                (ByteStream::from(bytes), Some(size))
            }
            UploadSource::File(path) => {
                // Streams from disk; the file is never fully buffered here.
                let body = ByteStream::from_path(&path).await.map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "Failed to open {} for upload: {}",
                        path.display(),
                        e
                    ))
                })?;
                (body, None)
            }
        };

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn grant_public_read(&self, key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();

        self.client
            .put_object_acl()
            .bucket(&self.bucket)
            .key(key)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 public-read grant failed"
                );
                StorageError::PermissionFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            "S3 public-read grant successful"
        );

        Ok(())
    }

    /// For AWS S3, uses the standard format: `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
    /// For S3-compatible providers, constructs a path-style URL from the endpoint.
    fn public_url(&self, key: &str) -> String {
        let encoded = Self::encode_key(key);
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, encoded)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, encoded
            )
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn public_url_uses_virtual_hosted_style_for_aws() {
        let storage = S3Storage::new(
            "printdesk-orders".to_string(),
            "eu-central-1".to_string(),
            None,
        )
        .await;
        assert_eq!(
            storage.public_url("orders/abc/flyer.pdf"),
            "https://printdesk-orders.s3.eu-central-1.amazonaws.com/orders/abc/flyer.pdf"
        );
    }

    #[tokio::test]
    async fn public_url_uses_path_style_for_custom_endpoints() {
        let storage = S3Storage::new(
            "orders".to_string(),
            "us-east-1".to_string(),
            Some("http://localhost:9000/".to_string()),
        )
        .await;
        assert_eq!(
            storage.public_url("orders/abc/flyer.pdf"),
            "http://localhost:9000/orders/orders/abc/flyer.pdf"
        );
    }

    #[tokio::test]
    async fn public_url_escapes_non_ascii_filenames() {
        let storage = S3Storage::new(
            "printdesk-orders".to_string(),
            "eu-central-1".to_string(),
            None,
        )
        .await;
        let url = storage.public_url("orders/abc/візитка.pdf");
        assert!(url.ends_with("/orders/abc/%D0%B2%D1%96%D0%B7%D0%B8%D1%82%D0%BA%D0%B0.pdf"));
    }
}
