use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

use super::{validate_key, BlobBackend};
use crate::error::BlobError;

/// Blob backend rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalBlobBackend {
    base_path: PathBuf,
}

impl LocalBlobBackend {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Maps a forward-slash key onto a native path below the base directory.
    pub fn resolve(&self, key: &str) -> PathBuf {
        key.split('/')
            .fold(self.base_path.clone(), |path, segment| path.join(segment))
    }

    async fn write_atomic(
        &self,
        path: &Path,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> std::io::Result<u64> {
        let parent = path.parent().unwrap_or(&self.base_path);
        fs::create_dir_all(parent).await?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp_path = parent.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        let result = async {
            let mut file = fs::File::create(&tmp_path).await?;
            let written = tokio::io::copy(reader, &mut file).await?;
            file.flush().await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&tmp_path, path).await?;
            Ok::<u64, std::io::Error>(written)
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&tmp_path).await;
        }
        result
    }
}

#[async_trait]
impl BlobBackend for LocalBlobBackend {
    async fn save(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<String, BlobError> {
        validate_key(key)?;
        let path = self.resolve(key);

        let written = self
            .write_atomic(&path, reader)
            .await
            .map_err(|source| BlobError::Write {
                path: path.clone(),
                source,
            })?;

        debug!("Stored {} bytes at {}", written, path.display());
        Ok(path.display().to_string())
    }
}
