//! Fake collaborators with call accounting.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use jobdesk::broadcast::SendError;
use jobdesk::storage::{BlobBackend, LocalBlobBackend};
use jobdesk::{BlobError, BroadcastRecord, ChannelSender, RecordStore, StoreError};

/// Sender that fails its first `fail_first` calls and records every card.
#[derive(Default)]
pub struct CountingSender {
    fail_first: u32,
    calls: AtomicU32,
    messages: Mutex<Vec<(String, String)>>,
}

impl CountingSender {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing_first(n: u32) -> Self {
        Self {
            fail_first: n,
            ..Default::default()
        }
    }

    pub fn always_failing() -> Self {
        Self::failing_first(u32::MAX)
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelSender for CountingSender {
    async fn send(&self, channel: &str, message: &str) -> Result<(), SendError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.messages
            .lock()
            .unwrap()
            .push((channel.to_string(), message.to_string()));

        if call <= self.fail_first {
            Err(SendError::Rejected {
                status: 429,
                description: format!("Too Many Requests (call {})", call),
            })
        } else {
            Ok(())
        }
    }
}

/// Record store whose saves always fail.
pub struct FailingStore;

#[async_trait]
impl RecordStore for FailingStore {
    async fn save(&self, _record: &BroadcastRecord) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: "/readonly/broadcasts.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }

    async fn list(&self) -> Result<Vec<BroadcastRecord>, StoreError> {
        Ok(Vec::new())
    }
}

/// Local backend that remembers which keys were written.
pub struct RecordingBlobBackend {
    inner: LocalBlobBackend,
    keys: Mutex<Vec<String>>,
}

impl RecordingBlobBackend {
    pub fn new(inner: LocalBlobBackend) -> Self {
        Self {
            inner,
            keys: Mutex::new(Vec::new()),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.keys.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobBackend for RecordingBlobBackend {
    async fn save(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<String, BlobError> {
        self.keys.lock().unwrap().push(key.to_string());
        self.inner.save(key, reader).await
    }
}
