use std::time::Duration;

use crate::config::IngestConfig;

pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSettings {
    /// Largest accepted declared size in bytes. Zero disables the check.
    pub max_file_size: u64,
    /// Accepted MIME types, compared case-insensitively. Empty accepts all.
    pub allowed_mime_types: Vec<String>,
    pub store_text: bool,
    pub operation_timeout: Duration,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            max_file_size: 0,
            allowed_mime_types: Vec::new(),
            store_text: false,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}

impl IngestSettings {
    pub fn is_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.is_empty()
            || self
                .allowed_mime_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(mime_type))
    }
}

impl From<&IngestConfig> for IngestSettings {
    fn from(config: &IngestConfig) -> Self {
        Self {
            max_file_size: config.max_file_size_bytes,
            allowed_mime_types: config.allowed_mime_types.clone(),
            store_text: config.store_text,
            operation_timeout: Duration::from_secs(config.operation_timeout_secs),
        }
    }
}
