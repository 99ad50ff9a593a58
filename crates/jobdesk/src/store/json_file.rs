use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::RecordStore;
use crate::broadcast::BroadcastRecord;
use crate::error::StoreError;

/// Record store kept as one indented JSON array on disk.
///
/// Every save rewrites the whole file through a temporary sibling and a
/// rename. Saves and lists are serialised within the process only; running two
/// processes against the same file is unsupported.
#[derive(Debug)]
pub struct JsonRecordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Latest revision of the record with the given id.
    pub async fn get(&self, id: &str) -> Result<Option<BroadcastRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let records = self.read_all().await?;
        Ok(records.into_iter().find(|r| r.id == id))
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    async fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(parent, e))?;
        }
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<BroadcastRecord>, StoreError> {
        self.ensure_parent().await?;

        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(&self.path, e)),
        };
        if data.is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&data).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_all(&self, records: &[BroadcastRecord]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(records).map_err(StoreError::Serialize)?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "records.json".to_string());
        let tmp_path = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        let result = async {
            let mut file = fs::File::create(&tmp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&tmp_path, &self.path).await
        }
        .await;

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(self.io_error(&self.path, e));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn save(&self, record: &BroadcastRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let mut records = self.read_all().await?;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }

        self.write_all(&records).await?;
        debug!(
            "Saved broadcast record {} ({} records in {})",
            record.id,
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn list(&self) -> Result<Vec<BroadcastRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }
}
