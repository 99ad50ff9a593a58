use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::error::RecogniseError;

/// Turns image bytes into text.
#[async_trait]
pub trait Recogniser: Send + Sync {
    async fn recognise(&self, image: Vec<u8>) -> Result<String, RecogniseError>;
}

/// Recogniser delegating to an HTTP OCR service that accepts the raw image as
/// `application/octet-stream` and answers with plain text.
#[derive(Debug, Clone)]
pub struct HttpRecogniser {
    client: Client,
    url: String,
}

impl HttpRecogniser {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RecogniseError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RecogniseError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Recogniser for HttpRecogniser {
    async fn recognise(&self, image: Vec<u8>) -> Result<String, RecogniseError> {
        tracing::debug!(size = image.len(), "Posting image to OCR endpoint {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await
            .map_err(|e| RecogniseError::Request(e.to_string()))?;

        let status = response.status();
        if status.as_u16() >= 300 {
            return Err(RecogniseError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| RecogniseError::Request(format!("read OCR response: {}", e)))
    }
}

#[cfg(feature = "tesseract")]
pub use tesseract::TesseractRecogniser;

#[cfg(feature = "tesseract")]
mod tesseract {
    use std::io::Cursor;
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::Recogniser;
    use crate::error::RecogniseError;

    /// Local OCR through Tesseract. Images are normalised to PNG first.
    #[derive(Clone)]
    pub struct TesseractRecogniser {
        languages: Arc<str>,
    }

    impl TesseractRecogniser {
        pub fn new(languages: &[String]) -> Self {
            let languages = if languages.is_empty() {
                "eng".to_string()
            } else {
                languages.join("+")
            };
            Self {
                languages: languages.into(),
            }
        }

        pub fn languages(&self) -> &str {
            &self.languages
        }

        pub fn recognise_bytes(&self, image_data: &[u8]) -> Result<String, RecogniseError> {
            let _span = tracing::info_span!("processor.ocr", provider = "tesseract").entered();

            let img = image::load_from_memory(image_data)
                .map_err(|e| RecogniseError::Engine(format!("Failed to load image: {}", e)))?;

            let mut png_data = Vec::new();
            img.write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)
                .map_err(|e| RecogniseError::Engine(format!("Failed to convert image: {}", e)))?;

            let mut lt = leptess::LepTess::new(None, &self.languages).map_err(|e| {
                RecogniseError::Engine(format!("Failed to initialize Tesseract: {}", e))
            })?;
            lt.set_image_from_mem(&png_data)
                .map_err(|e| RecogniseError::Engine(format!("Failed to set image: {}", e)))?;

            lt.get_utf8_text()
                .map_err(|e| RecogniseError::Engine(format!("OCR failed: {}", e)))
        }
    }

    #[async_trait]
    impl Recogniser for TesseractRecogniser {
        async fn recognise(&self, image: Vec<u8>) -> Result<String, RecogniseError> {
            let this = self.clone();
            tokio::task::spawn_blocking(move || this.recognise_bytes(&image))
                .await
                .map_err(|e| RecogniseError::Engine(format!("OCR task failed: {}", e)))?
        }
    }

}
