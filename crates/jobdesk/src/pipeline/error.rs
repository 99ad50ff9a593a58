use thiserror::Error;

use super::context::IngestOutput;
use crate::error::{BlobError, ExtractError};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("File too large: declared {declared} bytes, limit is {max}")]
    OversizeFile { declared: u64, max: u64 },

    #[error("File type not allowed: {0}")]
    DisallowedType(String),

    #[error("Failed to store raw upload: {0}")]
    RawStoreFailed(#[source] BlobError),

    #[error("Text extraction failed: {source}")]
    ExtractFailed {
        output: Box<IngestOutput>,
        #[source]
        source: ExtractError,
    },

    #[error("Failed to store extracted text: {source}")]
    TextStoreFailed {
        output: Box<IngestOutput>,
        #[source]
        source: BlobError,
    },

    #[error("Ingestion cancelled: deadline exceeded")]
    Cancelled { raw_location: Option<String> },
}

impl IngestError {
    /// What was persisted and extracted before the failure, if anything.
    pub fn partial_output(&self) -> Option<&IngestOutput> {
        match self {
            IngestError::ExtractFailed { output, .. }
            | IngestError::TextStoreFailed { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Location of the raw blob when it was written before the failure.
    pub fn raw_location(&self) -> Option<&str> {
        match self {
            IngestError::ExtractFailed { output, .. }
            | IngestError::TextStoreFailed { output, .. } => Some(&output.raw_location),
            IngestError::Cancelled { raw_location } => raw_location.as_deref(),
            _ => None,
        }
    }
}
