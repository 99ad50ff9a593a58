use std::io::{BufRead, BufReader, Cursor};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::Extracted;
use crate::error::ExtractError;

const DOCUMENT_ENTRY: &str = "word/document.xml";

/// Extracts the text runs of a Word document.
///
/// By default every character-data run is trimmed and followed by a single
/// space. With `preserve_paragraphs`, paragraph and table-cell ends become
/// line breaks instead.
pub fn extract_text(bytes: &[u8], preserve_paragraphs: bool) -> Result<Extracted, ExtractError> {
    let _span = tracing::info_span!("processor.docx", size = bytes.len()).entered();

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::MalformedDocument(format!("Failed to open DOCX: {}", e)))?;

    let entry = archive.by_name(DOCUMENT_ENTRY).map_err(|e| {
        ExtractError::MalformedDocument(format!("Failed to find {}: {}", DOCUMENT_ENTRY, e))
    })?;

    let text = parse_document_xml(BufReader::new(entry), preserve_paragraphs)?;
    Ok(Extracted {
        text,
        warnings: Vec::new(),
    })
}

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

struct TextCollector {
    out: String,
    run: String,
    preserve_paragraphs: bool,
}

impl TextCollector {
    fn flush_run(&mut self) {
        let trimmed = self.run.trim();
        if !trimmed.is_empty() {
            self.out.push_str(trimmed);
            self.out.push(' ');
        }
        self.run.clear();
    }

    fn end_block(&mut self) {
        self.flush_run();
        let kept = self.out.trim_end_matches(' ').len();
        self.out.truncate(kept);
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn finish(mut self) -> String {
        self.flush_run();
        if self.preserve_paragraphs {
            self.out.trim_end().to_string()
        } else {
            self.out
        }
    }
}

fn parse_document_xml<R: BufRead>(
    input: R,
    preserve_paragraphs: bool,
) -> Result<String, ExtractError> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut collector = TextCollector {
        out: String::new(),
        run: String::new(),
        preserve_paragraphs,
    };

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                let decoded = e.decode().map_err(|e| {
                    ExtractError::MalformedDocument(format!("Invalid text in document.xml: {}", e))
                })?;
                collector.run.push_str(&decoded);
            }
            Ok(Event::CData(e)) => {
                collector.run.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::GeneralRef(e)) => {
                let name = e.decode().map_err(|e| {
                    ExtractError::MalformedDocument(format!(
                        "Invalid entity in document.xml: {}",
                        e
                    ))
                })?;
                match resolve_entity(&name) {
                    Some(c) => collector.run.push(c),
                    None => {
                        return Err(ExtractError::MalformedDocument(format!(
                            "Unknown entity &{};",
                            name
                        )))
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let is_block = matches!(e.local_name().as_ref(), b"p" | b"tc");
                if preserve_paragraphs && is_block {
                    collector.end_block();
                } else {
                    collector.flush_run();
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => collector.flush_run(),
            Err(e) => {
                return Err(ExtractError::MalformedDocument(format!(
                    "XML parsing error at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
        buf.clear();
    }

    Ok(collector.finish())
}
