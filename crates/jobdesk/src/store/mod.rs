//! Durable storage of broadcast records.

pub mod json_file;

use async_trait::async_trait;

use crate::broadcast::BroadcastRecord;
use crate::error::StoreError;

pub use json_file::JsonRecordStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts the record, or replaces the stored record with the same id in
    /// place.
    async fn save(&self, record: &BroadcastRecord) -> Result<(), StoreError>;

    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<BroadcastRecord>, StoreError>;
}
