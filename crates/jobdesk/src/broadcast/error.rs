use thiserror::Error;

use super::record::BroadcastRecord;
use crate::error::StoreError;

#[derive(Error, Debug)]
pub enum SummariseError {
    #[error("Summariser request failed: {0}")]
    Request(String),

    #[error("Summariser responded with status {0}")]
    Status(u16),
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("channel rejected message (status {status}): {description}")]
    Rejected { status: u16, description: String },

    #[error("{0}")]
    Other(String),
}

/// Failure of a broadcast. Variants raised after the record was created carry
/// it, so callers can inspect attempts and error history.
#[derive(Error, Debug)]
pub enum BroadcastError {
    #[error("Failed to summarise posting: {0}")]
    SummariseFailed(#[source] SummariseError),

    #[error("Failed to deliver broadcast {} after {} attempt(s): {source}", .record.id, .record.attempts)]
    SendFailed {
        record: Box<BroadcastRecord>,
        #[source]
        source: SendError,
    },

    #[error("Failed to persist broadcast {}: {source}", .record.id)]
    PersistFailed {
        record: Box<BroadcastRecord>,
        #[source]
        source: StoreError,
    },
}

impl BroadcastError {
    pub fn record(&self) -> Option<&BroadcastRecord> {
        match self {
            BroadcastError::SummariseFailed(_) => None,
            BroadcastError::SendFailed { record, .. }
            | BroadcastError::PersistFailed { record, .. } => Some(record),
        }
    }

    pub fn into_record(self) -> Option<BroadcastRecord> {
        match self {
            BroadcastError::SummariseFailed(_) => None,
            BroadcastError::SendFailed { record, .. }
            | BroadcastError::PersistFailed { record, .. } => Some(*record),
        }
    }
}
