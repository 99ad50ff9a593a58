//! Text extraction from uploaded documents, dispatched on MIME type.

pub mod docx;
pub mod ocr;
pub mod pdf;

use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::Instant;
use tracing::Instrument;

use crate::config::OcrConfig;
use crate::error::{ConfigError, ExtractError};

pub use ocr::{HttpRecogniser, Recogniser};
#[cfg(feature = "tesseract")]
pub use ocr::TesseractRecogniser;

/// Extracted text plus non-fatal warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extracted {
    pub text: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Image,
}

impl DocumentKind {
    /// Matches a MIME hint, ignoring case.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let mime = mime_type.to_ascii_lowercase();
        if mime.contains("pdf") {
            Some(DocumentKind::Pdf)
        } else if mime.contains("wordprocessingml") || mime.contains("msword") {
            Some(DocumentKind::Docx)
        } else if mime.starts_with("image/") {
            Some(DocumentKind::Image)
        } else {
            None
        }
    }
}

#[derive(Clone, Default)]
pub struct TextExtractor {
    recogniser: Option<Arc<dyn Recogniser>>,
    preserve_paragraphs: bool,
}

impl TextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires the recogniser described by `ocr`: the HTTP endpoint when set,
    /// otherwise local Tesseract when built with it and languages are listed.
    pub fn from_config(ocr: &OcrConfig, preserve_paragraphs: bool) -> Result<Self, ConfigError> {
        let extractor = Self::new().preserve_paragraphs(preserve_paragraphs);

        if let Some(endpoint) = &ocr.endpoint {
            let recogniser = HttpRecogniser::new(
                endpoint.clone(),
                std::time::Duration::from_secs(ocr.timeout_secs),
            )
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
            return Ok(extractor.with_recogniser(Arc::new(recogniser)));
        }

        #[cfg(feature = "tesseract")]
        if let Some(languages) = ocr.languages.as_deref().filter(|l| !l.is_empty()) {
            return Ok(extractor.with_recogniser(Arc::new(TesseractRecogniser::new(languages))));
        }

        Ok(extractor)
    }

    pub fn with_recogniser(mut self, recogniser: Arc<dyn Recogniser>) -> Self {
        self.recogniser = Some(recogniser);
        self
    }

    pub fn preserve_paragraphs(mut self, preserve: bool) -> Self {
        self.preserve_paragraphs = preserve;
        self
    }

    pub fn has_recogniser(&self) -> bool {
        self.recogniser.is_some()
    }

    /// Extracts text from a fully buffered document.
    pub async fn extract(
        &self,
        mime_type: &str,
        content: Vec<u8>,
        deadline: Option<Instant>,
    ) -> Result<Extracted, ExtractError> {
        let kind = DocumentKind::from_mime(mime_type)
            .ok_or_else(|| ExtractError::UnsupportedType(mime_type.to_string()))?;

        match kind {
            DocumentKind::Pdf => {
                let deadline = deadline.map(Instant::into_std);
                run_blocking(move || pdf::extract_text(&content, deadline)).await
            }
            DocumentKind::Docx => {
                let preserve = self.preserve_paragraphs;
                run_blocking(move || docx::extract_text(&content, preserve)).await
            }
            DocumentKind::Image => {
                let recogniser = self
                    .recogniser
                    .as_ref()
                    .ok_or(ExtractError::RecogniserUnavailable)?;

                let span = tracing::info_span!("processor.ocr", size = content.len());
                let recognise = recogniser.recognise(content).instrument(span);
                let text = match deadline {
                    Some(deadline) => tokio::time::timeout_at(deadline, recognise)
                        .await
                        .map_err(|_| ExtractError::Cancelled)??,
                    None => recognise.await?,
                };

                Ok(Extracted {
                    text,
                    warnings: Vec::new(),
                })
            }
        }
    }

    /// Buffers `reader` completely, then extracts from the buffer.
    pub async fn extract_reader<R>(
        &self,
        mime_type: &str,
        mut reader: R,
        deadline: Option<Instant>,
    ) -> Result<Extracted, ExtractError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut content = Vec::new();
        reader
            .read_to_end(&mut content)
            .await
            .map_err(|e| ExtractError::MalformedDocument(format!("Failed to read input: {}", e)))?;
        self.extract(mime_type, content, deadline).await
    }
}

impl std::fmt::Debug for TextExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextExtractor")
            .field("has_recogniser", &self.has_recogniser())
            .field("preserve_paragraphs", &self.preserve_paragraphs)
            .finish()
    }
}

async fn run_blocking<F>(task: F) -> Result<Extracted, ExtractError>
where
    F: FnOnce() -> Result<Extracted, ExtractError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ExtractError::MalformedDocument(format!("Extraction task failed: {}", e)))?
}
