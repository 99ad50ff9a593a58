//! Test harness for isolated pipeline execution.
//!
//! The `TestHarness` owns a temporary directory holding the broadcast record
//! file and the blob root, and builds pipelines on top of them with a clock
//! frozen at 2026-10-18 09:00 UTC.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use jobdesk::broadcast::SimpleSummariser;
use jobdesk::{
    BroadcastPipeline, ChannelSender, Clock, FixedClock, IngestPipeline, IngestSettings,
    JsonRecordStore, LocalBlobBackend, RecordStore, TextExtractor,
};

use super::fakes::RecordingBlobBackend;

pub const CHANNEL: &str = "@golang_jobs";

pub struct TestHarness {
    temp_dir: TempDir,
    /// Broadcast record file within temp_dir.
    pub records_path: PathBuf,
    /// Blob root within temp_dir.
    pub blob_dir: PathBuf,
    pub clock: Arc<FixedClock>,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let records_path = temp_dir.path().join("state").join("broadcasts.json");
        let blob_dir = temp_dir.path().join("blobs");
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap(),
        ));

        Self {
            temp_dir,
            records_path,
            blob_dir,
            clock,
        }
    }

    pub fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Date prefix of blob keys written under the harness clock.
    pub fn date_prefix(&self) -> &'static str {
        "2026/10/18"
    }

    pub fn record_store(&self) -> Arc<JsonRecordStore> {
        Arc::new(JsonRecordStore::new(&self.records_path))
    }

    pub fn broadcast_pipeline(&self, sender: Arc<dyn ChannelSender>) -> BroadcastPipeline {
        self.broadcast_pipeline_with_store(sender, self.record_store())
    }

    pub fn broadcast_pipeline_with_store(
        &self,
        sender: Arc<dyn ChannelSender>,
        store: Arc<dyn RecordStore>,
    ) -> BroadcastPipeline {
        BroadcastPipeline::new(sender, store, Arc::new(SimpleSummariser), CHANNEL)
            .with_clock(self.clock.clone())
    }

    pub fn blob_backend(&self) -> Arc<RecordingBlobBackend> {
        Arc::new(RecordingBlobBackend::new(LocalBlobBackend::new(
            &self.blob_dir,
        )))
    }

    pub fn ingest_pipeline(
        &self,
        blobs: Arc<RecordingBlobBackend>,
        extractor: TextExtractor,
        settings: IngestSettings,
    ) -> IngestPipeline {
        IngestPipeline::new(blobs, extractor, settings).with_clock(self.clock.clone())
    }

    /// Reads a blob back from its returned location.
    pub fn read_blob(&self, location: &str) -> Vec<u8> {
        std::fs::read(location).expect("blob should exist at its location")
    }
}
