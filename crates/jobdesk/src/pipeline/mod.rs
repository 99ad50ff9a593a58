//! Candidate document ingestion: validate, store raw, extract, store text.

pub mod config;
pub mod context;
pub mod error;
pub mod runner;
pub mod tee;

pub use config::{IngestSettings, DEFAULT_OPERATION_TIMEOUT};
pub use context::{blob_file_name, IngestOutput, InputFile};
pub use error::IngestError;
pub use runner::IngestPipeline;
pub use tee::TeeReader;
