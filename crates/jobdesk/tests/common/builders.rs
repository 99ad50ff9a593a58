//! Builders for postings and document fixtures.

#![allow(dead_code)]

use std::io::Write;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use jobdesk::JobPosting;

/// Builder for `JobPosting` values.
#[derive(Default)]
pub struct PostingBuilder {
    posting: JobPosting,
}

impl PostingBuilder {
    pub fn new(title: &str, company: &str) -> Self {
        Self {
            posting: JobPosting {
                title: title.to_string(),
                company: company.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn location(mut self, value: &str) -> Self {
        self.posting.location = value.to_string();
        self
    }

    pub fn salary(mut self, value: &str) -> Self {
        self.posting.salary = value.to_string();
        self
    }

    pub fn experience(mut self, value: &str) -> Self {
        self.posting.experience = value.to_string();
        self
    }

    pub fn description(mut self, value: &str) -> Self {
        self.posting.description = value.to_string();
        self
    }

    pub fn contact(mut self, value: &str) -> Self {
        self.posting.contact = value.to_string();
        self
    }

    pub fn build(self) -> JobPosting {
        self.posting
    }
}

/// A posting with every field populated.
pub fn full_posting() -> JobPosting {
    PostingBuilder::new("Backend Engineer", "ACME")
        .location("Remote")
        .salary("$4k")
        .experience("3y")
        .description("Own the payments API. Work with Go and Postgres.")
        .contact("@acmejobs")
        .build()
}

/// Multi-page PDF where each entry is one page and every `\n` in an entry
/// starts a new text line, the way a CV export lays out its sections.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|page| {
            let mut operations = Vec::new();
            for (i, line) in page.lines().enumerate() {
                let y = 760 - 16 * i as i64;
                operations.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 11.into()]),
                    Operation::new("Td", vec![72.into(), y.into()]),
                    Operation::new("Tj", vec![Object::string_literal(line)]),
                    Operation::new("ET", vec![]),
                ]);
            }
            let content = Content { operations }.encode().unwrap();
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));

            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// DOCX whose body holds one paragraph per entry.
pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}
