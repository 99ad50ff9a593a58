use serde::Serialize;
use tokio::io::AsyncRead;

use crate::processor::Extracted;

/// An upload waiting to be ingested.
pub struct InputFile {
    pub name: String,
    pub mime_type: String,
    pub declared_size: u64,
    pub content: Box<dyn AsyncRead + Send + Unpin>,
}

impl InputFile {
    /// Creates an input. An empty `mime_type` is guessed from `name`.
    pub fn new<R>(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        declared_size: u64,
        content: R,
    ) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let name = name.into();
        let mut mime_type = mime_type.into();
        if mime_type.trim().is_empty() {
            mime_type = mime_guess::from_path(&name)
                .first_or_octet_stream()
                .essence_str()
                .to_string();
        }

        Self {
            name,
            mime_type,
            declared_size,
            content: Box::new(content),
        }
    }

    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let size = bytes.len() as u64;
        Self::new(name, mime_type, size, std::io::Cursor::new(bytes))
    }
}

impl std::fmt::Debug for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("declared_size", &self.declared_size)
            .finish_non_exhaustive()
    }
}

/// What an ingestion persisted and extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutput {
    pub raw_location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_location: Option<String>,
    pub extracted: Extracted,
}

/// File name safe to use as the last segment of a blob key.
pub fn blob_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "upload".to_string(),
        _ => cleaned,
    }
}
