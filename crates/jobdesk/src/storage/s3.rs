use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::info;

use super::{validate_key, BlobBackend};
use crate::error::BlobError;

/// Blob backend storing whole objects in an S3 bucket.
pub struct S3BlobBackend {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3BlobBackend {
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    /// Builds a client from the default AWS credential chain.
    pub async fn from_defaults(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), bucket, prefix)
    }

    pub fn object_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", self.prefix, key)
        }
    }
}

#[async_trait]
impl BlobBackend for S3BlobBackend {
    async fn save(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<String, BlobError> {
        validate_key(key)?;

        let mut body = Vec::new();
        reader.read_to_end(&mut body).await.map_err(BlobError::Read)?;
        let size = body.len();

        let object_key = self.object_key(key);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| BlobError::Remote(e.to_string()))?;

        let location = format!("s3://{}/{}", self.bucket, object_key);
        info!("Wrote {} bytes to {}", size, location);
        Ok(location)
    }
}
