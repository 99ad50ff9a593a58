//! Document ingestion scenarios against the local blob backend.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use common::{docx_with_paragraphs, pdf_with_pages, TestHarness};
use jobdesk::error::NO_OCR_PROVIDER_WARNING;
use jobdesk::{
    ExtractError, IngestError, IngestSettings, InputFile, RecogniseError, Recogniser,
    TextExtractor,
};

const PDF: &str = "application/pdf";
const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

fn settings(store_text: bool) -> IngestSettings {
    IngestSettings {
        max_file_size: 10 * 1024 * 1024,
        allowed_mime_types: vec![PDF.to_string(), DOCX.to_string(), "image/png".to_string()],
        store_text,
        operation_timeout: Duration::from_secs(10),
    }
}

struct StaticRecogniser(&'static str);

#[async_trait]
impl Recogniser for StaticRecogniser {
    async fn recognise(&self, _image: Vec<u8>) -> Result<String, RecogniseError> {
        Ok(self.0.to_string())
    }
}

#[tokio::test]
async fn test_oversize_upload_rejected_before_storage() {
    let harness = TestHarness::new();
    let blobs = harness.blob_backend();
    let pipeline = harness.ingest_pipeline(
        blobs.clone(),
        TextExtractor::new(),
        IngestSettings {
            max_file_size: 1024,
            ..settings(true)
        },
    );

    let file = InputFile::new("cv.pdf", PDF, 2048, std::io::Cursor::new(vec![0u8; 16]));
    let err = pipeline.ingest(file).await.unwrap_err();

    assert!(matches!(
        err,
        IngestError::OversizeFile {
            declared: 2048,
            max: 1024
        }
    ));
    assert_eq!(blobs.write_count(), 0);
    assert!(!harness.blob_dir.exists());
}

#[tokio::test]
async fn test_disallowed_type_rejected_before_storage() {
    let harness = TestHarness::new();
    let blobs = harness.blob_backend();
    let pipeline = harness.ingest_pipeline(blobs.clone(), TextExtractor::new(), settings(true));

    let file = InputFile::from_bytes("notes.txt", "text/plain", b"hello".to_vec());
    let err = pipeline.ingest(file).await.unwrap_err();

    assert!(matches!(err, IngestError::DisallowedType(ref m) if m == "text/plain"));
    assert_eq!(blobs.write_count(), 0);
}

#[tokio::test]
async fn test_pdf_stored_with_text() {
    let harness = TestHarness::new();
    let blobs = harness.blob_backend();
    let pipeline = harness.ingest_pipeline(blobs.clone(), TextExtractor::new(), settings(true));

    let bytes = pdf_with_pages(&["Jane Doe\nRust developer", "Tashkent, remote"]);
    let output = pipeline
        .ingest(InputFile::from_bytes("cv.pdf", PDF, bytes.clone()))
        .await
        .unwrap();

    assert!(output.raw_location.ends_with("2026/10/18/cv.pdf"));
    let text_location = output.text_location.clone().unwrap();
    assert!(text_location.ends_with("2026/10/18/cv.txt"));
    assert_eq!(
        blobs.keys(),
        vec!["2026/10/18/cv.pdf".to_string(), "2026/10/18/cv.txt".to_string()]
    );

    assert_eq!(harness.read_blob(&output.raw_location), bytes);
    assert_eq!(
        harness.read_blob(&text_location),
        output.extracted.text.as_bytes()
    );
    assert!(output.extracted.text.contains("Jane Doe"));
    assert!(output.extracted.text.contains("Rust developer"));
    assert!(output.extracted.text.contains("Tashkent, remote"));
}

#[tokio::test]
async fn test_text_not_stored_when_disabled() {
    let harness = TestHarness::new();
    let blobs = harness.blob_backend();
    let pipeline = harness.ingest_pipeline(blobs.clone(), TextExtractor::new(), settings(false));

    let output = pipeline
        .ingest(InputFile::from_bytes(
            "cv.pdf",
            PDF,
            pdf_with_pages(&["Jane Doe"]),
        ))
        .await
        .unwrap();

    assert!(output.text_location.is_none());
    assert_eq!(blobs.write_count(), 1);
}

#[tokio::test]
async fn test_docx_text_stored() {
    let harness = TestHarness::new();
    let blobs = harness.blob_backend();
    let pipeline = harness.ingest_pipeline(blobs.clone(), TextExtractor::new(), settings(true));

    let bytes = docx_with_paragraphs(&["Senior Rust Engineer", "Remote only"]);
    let output = pipeline
        .ingest(InputFile::from_bytes("resume.docx", DOCX, bytes))
        .await
        .unwrap();

    assert_eq!(output.extracted.text, "Senior Rust Engineer Remote only ");
    let text_location = output.text_location.unwrap();
    assert!(text_location.ends_with("2026/10/18/resume.txt"));
    assert_eq!(
        harness.read_blob(&text_location),
        b"Senior Rust Engineer Remote only "
    );
}

#[tokio::test]
async fn test_docx_paragraphs_preserved_when_enabled() {
    let harness = TestHarness::new();
    let pipeline = harness.ingest_pipeline(
        harness.blob_backend(),
        TextExtractor::new().preserve_paragraphs(true),
        settings(false),
    );

    let bytes = docx_with_paragraphs(&["Senior Rust Engineer", "Remote only"]);
    let output = pipeline
        .ingest(InputFile::from_bytes("resume.docx", DOCX, bytes))
        .await
        .unwrap();

    assert_eq!(output.extracted.text, "Senior Rust Engineer\nRemote only");
}

#[tokio::test]
async fn test_malformed_pdf_keeps_raw_blob() {
    let harness = TestHarness::new();
    let blobs = harness.blob_backend();
    let pipeline = harness.ingest_pipeline(blobs.clone(), TextExtractor::new(), settings(true));

    let err = pipeline
        .ingest(InputFile::from_bytes("cv.pdf", PDF, b"not a pdf".to_vec()))
        .await
        .unwrap_err();

    let raw_location = err.raw_location().map(str::to_string).unwrap();
    assert_eq!(harness.read_blob(&raw_location), b"not a pdf");
    let output = err.partial_output().unwrap();
    assert!(output.text_location.is_none());
    assert!(matches!(
        err,
        IngestError::ExtractFailed {
            source: ExtractError::MalformedDocument(_),
            ..
        }
    ));
    assert_eq!(blobs.write_count(), 1);
}

#[tokio::test]
async fn test_image_without_recogniser_warns() {
    let harness = TestHarness::new();
    let blobs = harness.blob_backend();
    let pipeline = harness.ingest_pipeline(blobs.clone(), TextExtractor::new(), settings(true));

    let err = pipeline
        .ingest(InputFile::from_bytes("scan.png", "image/png", vec![0x89, b'P', b'N', b'G']))
        .await
        .unwrap_err();

    let output = err.partial_output().unwrap();
    assert!(output.raw_location.ends_with("2026/10/18/scan.png"));
    assert_eq!(output.extracted.warnings, vec![NO_OCR_PROVIDER_WARNING.to_string()]);
    assert!(output.text_location.is_none());
    assert_eq!(blobs.write_count(), 1);
}

#[tokio::test]
async fn test_image_recognised_and_stored() {
    let harness = TestHarness::new();
    let blobs = harness.blob_backend();
    let extractor =
        TextExtractor::new().with_recogniser(Arc::new(StaticRecogniser("Scanned diploma")));
    let pipeline = harness.ingest_pipeline(blobs.clone(), extractor, settings(true));

    let output = pipeline
        .ingest(InputFile::from_bytes("scan.png", "image/png", vec![1, 2, 3]))
        .await
        .unwrap();

    assert_eq!(output.extracted.text, "Scanned diploma");
    assert!(output.extracted.warnings.is_empty());
    assert_eq!(
        harness.read_blob(&output.text_location.unwrap()),
        b"Scanned diploma"
    );
}

#[tokio::test]
async fn test_allow_list_ignores_case() {
    let harness = TestHarness::new();
    let pipeline =
        harness.ingest_pipeline(harness.blob_backend(), TextExtractor::new(), settings(false));

    let output = pipeline
        .ingest(InputFile::from_bytes(
            "CV.PDF",
            "Application/PDF",
            pdf_with_pages(&["Jane Doe"]),
        ))
        .await
        .unwrap();

    assert!(output.raw_location.ends_with("2026/10/18/CV.PDF"));
}

#[tokio::test]
async fn test_mime_type_guessed_from_name() {
    let harness = TestHarness::new();
    let pipeline =
        harness.ingest_pipeline(harness.blob_backend(), TextExtractor::new(), settings(false));

    let output = pipeline
        .ingest(InputFile::from_bytes("cv.pdf", "", pdf_with_pages(&["Jane Doe"])))
        .await
        .unwrap();

    assert!(output.extracted.text.contains("Jane Doe"));
}

#[tokio::test]
async fn test_upload_name_cannot_escape_date_prefix() {
    let harness = TestHarness::new();
    let blobs = harness.blob_backend();
    let pipeline = harness.ingest_pipeline(blobs.clone(), TextExtractor::new(), settings(false));

    pipeline
        .ingest(InputFile::from_bytes(
            "../../etc/cv.pdf",
            PDF,
            pdf_with_pages(&["Jane Doe"]),
        ))
        .await
        .unwrap();

    let keys = blobs.keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("2026/10/18/"));
    assert!(!keys[0]["2026/10/18/".len()..].contains('/'));
}
