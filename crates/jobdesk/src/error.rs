use std::path::PathBuf;
use thiserror::Error;

use crate::broadcast::BroadcastError;
use crate::pipeline::IngestError;

#[derive(Error, Debug)]
pub enum JobdeskError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    #[error("Blob storage error: {0}")]
    Blob(#[from] BlobError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Broadcast error: {0}")]
    Broadcast(#[from] BroadcastError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Environment variable '{name}' not set")]
    MissingSecret { name: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors raised by the durable record store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access record store '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record store '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Invalid blob key '{0}'")]
    InvalidKey(String),

    #[error("Failed to write blob '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read blob content: {0}")]
    Read(#[source] std::io::Error),

    #[error("Remote storage error: {0}")]
    Remote(String),
}

/// Warning attached to image extraction when no recogniser is wired in.
pub const NO_OCR_PROVIDER_WARNING: &str = "no OCR provider configured";

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unsupported MIME type: {0}")]
    UnsupportedType(String),

    #[error("Cannot recognise image: {NO_OCR_PROVIDER_WARNING}")]
    RecogniserUnavailable,

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Image recognition failed: {0}")]
    Recognition(#[from] RecogniseError),

    #[error("Extraction cancelled: deadline exceeded")]
    Cancelled,
}

impl ExtractError {
    /// Non-fatal warnings that accompany this failure.
    pub fn warnings(&self) -> Vec<String> {
        match self {
            ExtractError::RecogniserUnavailable => vec![NO_OCR_PROVIDER_WARNING.to_string()],
            _ => Vec::new(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RecogniseError {
    #[error("OCR request failed: {0}")]
    Request(String),

    #[error("OCR endpoint responded with status {0}")]
    Status(u16),

    #[error("OCR engine failed: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, JobdeskError>;
