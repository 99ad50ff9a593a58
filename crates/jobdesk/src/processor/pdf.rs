use std::time::Instant;

use super::Extracted;
use crate::error::ExtractError;

/// Extracts the plain text of every page, one page per line block.
///
/// Pages without text are skipped. A page whose content cannot be decoded is
/// reported as a warning instead of failing the document. `deadline` is
/// checked before each page.
pub fn extract_text(bytes: &[u8], deadline: Option<Instant>) -> Result<Extracted, ExtractError> {
    let _span = tracing::info_span!("processor.pdf", size = bytes.len()).entered();

    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| ExtractError::MalformedDocument(format!("Failed to load PDF: {}", e)))?;

    let mut extracted = Extracted::default();
    for (page_num, _) in doc.get_pages() {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            tracing::warn!(page = page_num, "Deadline passed during PDF extraction");
            return Err(ExtractError::Cancelled);
        }

        match doc.extract_text(&[page_num]) {
            Ok(page_text) => {
                let page_text = page_text.trim_end();
                if page_text.trim().is_empty() {
                    continue;
                }
                extracted.text.push_str(page_text);
                extracted.text.push('\n');
            }
            Err(e) => {
                tracing::warn!(page = page_num, "Failed to extract page text: {}", e);
                extracted
                    .warnings
                    .push(format!("page {}: text extraction failed: {}", page_num, e));
            }
        }
    }

    Ok(extracted)
}
