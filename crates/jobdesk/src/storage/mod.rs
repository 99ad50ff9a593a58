//! Opaque byte storage for ingested documents and their extracted text.

pub mod filesystem;
#[cfg(feature = "s3")]
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncRead;

use crate::config::StorageConfig;
use crate::error::{BlobError, ConfigError};

pub use filesystem::LocalBlobBackend;
#[cfg(feature = "s3")]
pub use s3::S3BlobBackend;

/// Byte storage addressed by forward-slash keys.
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// Stores everything `reader` yields under `key` and returns the canonical
    /// location. Either all bytes are stored or an error is returned.
    async fn save(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<String, BlobError>;
}

/// Builds the backend selected in the configuration.
pub async fn backend_from_config(
    config: &StorageConfig,
) -> Result<Arc<dyn BlobBackend>, ConfigError> {
    match config {
        StorageConfig::Local { base_path } => Ok(Arc::new(LocalBlobBackend::new(base_path))),
        #[cfg(feature = "s3")]
        StorageConfig::S3 { bucket, prefix } => Ok(Arc::new(
            S3BlobBackend::from_defaults(bucket.clone(), prefix.clone()).await,
        )),
        #[cfg(not(feature = "s3"))]
        StorageConfig::S3 { .. } => Err(ConfigError::Validation {
            message: "S3 storage requires the `s3` feature".to_string(),
        }),
    }
}

/// Key of a raw upload: `YYYY/MM/DD/{name}`.
pub fn raw_key(date: DateTime<Utc>, name: &str) -> String {
    format!("{}/{}", date.format("%Y/%m/%d"), name)
}

/// Key of the extracted text for a raw key: the final extension of the last
/// segment is replaced by `.txt`.
pub fn text_key(raw_key: &str) -> String {
    let segment_start = raw_key.rfind('/').map(|i| i + 1).unwrap_or(0);
    let stem_end = raw_key[segment_start..]
        .rfind('.')
        .map(|i| segment_start + i)
        .unwrap_or(raw_key.len());
    format!("{}.txt", &raw_key[..stem_end])
}

/// Rejects keys that could escape the backend root.
pub fn validate_key(key: &str) -> Result<(), BlobError> {
    let invalid = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.contains('\0')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");

    if invalid {
        return Err(BlobError::InvalidKey(key.to_string()));
    }
    Ok(())
}
