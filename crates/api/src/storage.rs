//! S3-backed storage for news screenshots.

use aws_sdk_s3::primitives::ByteStream;
use uuid::Uuid;
use veritas_core::types::DbId;

/// Error type for screenshot upload failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("S3 upload error: {0}")]
    Upload(String),
}

/// Uploads screenshots to an S3 bucket and returns their public URL.
pub struct ScreenshotStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
    /// Public base URL prefixed to object keys, e.g. a CDN domain.
    public_base_url: String,
}

impl ScreenshotStorage {
    /// Build the storage client from environment variables.
    ///
    /// Returns `None` if `SCREENSHOT_BUCKET` is not set, signalling
    /// that screenshot uploads are disabled. Credentials and region
    /// come from the standard AWS environment/config chain.
    ///
    /// | Variable                 | Required | Default                         |
    /// |--------------------------|----------|---------------------------------|
    /// | `SCREENSHOT_BUCKET`      | yes      | (none)                          |
    /// | `SCREENSHOT_PUBLIC_URL`  | no       | `https://<bucket>.s3.amazonaws.com` |
    pub async fn from_env() -> Option<Self> {
        let bucket = std::env::var("SCREENSHOT_BUCKET").ok()?;
        let public_base_url = std::env::var("SCREENSHOT_PUBLIC_URL")
            .unwrap_or_else(|_| format!("https://{bucket}.s3.amazonaws.com"));

        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Some(Self {
            client: aws_sdk_s3::Client::new(&config),
            bucket,
            public_base_url,
        })
    }

    /// Upload a screenshot for a news item, returning its public URL.
    ///
    /// Keys are namespaced under `screenshots/` and carry a random
    /// suffix so re-uploads never overwrite each other.
    pub async fn upload_screenshot(
        &self,
        news_id: DbId,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let extension = match content_type {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            other => return Err(StorageError::Upload(format!("unsupported content type: {other}"))),
        };
        let key = format!("screenshots/{news_id}/{}.{extension}", Uuid::new_v4());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        tracing::info!(%news_id, key, "Screenshot uploaded");
        Ok(format!("{}/{key}", self.public_base_url))
    }
}
