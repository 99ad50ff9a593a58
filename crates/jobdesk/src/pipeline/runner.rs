use std::sync::Arc;

use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{ConfigError, ExtractError};
use crate::processor::{Extracted, TextExtractor};
use crate::storage::{backend_from_config, raw_key, text_key, BlobBackend};

use super::config::IngestSettings;
use super::context::{blob_file_name, IngestOutput, InputFile};
use super::error::IngestError;
use super::tee::TeeReader;

/// Stores uploads as raw blobs, extracts their text and optionally stores the
/// text next to the raw blob.
pub struct IngestPipeline {
    store: Arc<dyn BlobBackend>,
    extractor: TextExtractor,
    settings: IngestSettings,
    clock: Arc<dyn Clock>,
}

impl IngestPipeline {
    pub fn new(
        store: Arc<dyn BlobBackend>,
        extractor: TextExtractor,
        settings: IngestSettings,
    ) -> Self {
        Self {
            store,
            extractor,
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    /// Production constructor: storage backend, extractor and limits from
    /// the configuration.
    pub async fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let store = backend_from_config(&config.storage).await?;
        let extractor =
            TextExtractor::from_config(&config.ocr, config.ingest.preserve_paragraphs)?;
        Ok(Self::new(
            store,
            extractor,
            IngestSettings::from(&config.ingest),
        ))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &IngestSettings {
        &self.settings
    }

    /// Checks the declared size and MIME type without touching storage.
    pub fn validate(&self, file: &InputFile) -> Result<(), IngestError> {
        let max = self.settings.max_file_size;
        if max > 0 && file.declared_size > max {
            return Err(IngestError::OversizeFile {
                declared: file.declared_size,
                max,
            });
        }
        if !self.settings.is_allowed(&file.mime_type) {
            return Err(IngestError::DisallowedType(file.mime_type.clone()));
        }
        Ok(())
    }

    /// Ingests one upload under the configured operation timeout.
    pub async fn ingest(&self, file: InputFile) -> Result<IngestOutput, IngestError> {
        let deadline = Instant::now() + self.settings.operation_timeout;
        let span = info_span!(
            "ingest",
            name = %file.name,
            mime = %file.mime_type,
            size = file.declared_size
        );
        self.run(file, deadline).instrument(span).await
    }

    async fn run(&self, file: InputFile, deadline: Instant) -> Result<IngestOutput, IngestError> {
        self.validate(&file)?;

        let InputFile {
            name,
            mime_type,
            content,
            ..
        } = file;

        let key = raw_key(self.clock.now(), &blob_file_name(&name));
        let mut tee = TeeReader::new(content);
        let raw_location = match timeout_at(deadline, self.store.save(&key, &mut tee)).await {
            Ok(Ok(location)) => location,
            Ok(Err(e)) => return Err(IngestError::RawStoreFailed(e)),
            Err(_) => {
                warn!("Deadline passed while storing raw upload");
                return Err(IngestError::Cancelled { raw_location: None });
            }
        };
        debug!(location = %raw_location, "Raw upload stored");

        let buffered = tee.into_buffer();
        let extracted = match timeout_at(
            deadline,
            self.extractor.extract(&mime_type, buffered, Some(deadline)),
        )
        .await
        {
            Ok(Ok(extracted)) => extracted,
            Ok(Err(ExtractError::Cancelled)) | Err(_) => {
                warn!(location = %raw_location, "Deadline passed during extraction");
                return Err(IngestError::Cancelled {
                    raw_location: Some(raw_location),
                });
            }
            Ok(Err(e)) => {
                warn!(location = %raw_location, error = %e, "Extraction failed, raw upload kept");
                let output = IngestOutput {
                    raw_location,
                    text_location: None,
                    extracted: Extracted {
                        text: String::new(),
                        warnings: e.warnings(),
                    },
                };
                return Err(IngestError::ExtractFailed {
                    output: Box::new(output),
                    source: e,
                });
            }
        };

        let mut output = IngestOutput {
            raw_location,
            text_location: None,
            extracted,
        };
        if !self.settings.store_text {
            info!(chars = output.extracted.text.len(), "Upload ingested");
            return Ok(output);
        }

        let text_key = text_key(&key);
        let mut text = output.extracted.text.as_bytes();
        match timeout_at(deadline, self.store.save(&text_key, &mut text)).await {
            Ok(Ok(location)) => {
                debug!(location = %location, "Extracted text stored");
                output.text_location = Some(location);
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to store extracted text");
                return Err(IngestError::TextStoreFailed {
                    output: Box::new(output),
                    source: e,
                });
            }
            Err(_) => {
                warn!("Deadline passed while storing extracted text");
                return Err(IngestError::Cancelled {
                    raw_location: Some(output.raw_location),
                });
            }
        }

        info!(chars = output.extracted.text.len(), "Upload ingested");
        Ok(output)
    }
}
