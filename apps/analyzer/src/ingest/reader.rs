//! Document Text Reader: PDF and DOCX to plain text.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to open document: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("failed to parse DOCX: {0}")]
    Docx(String),

    #[error("unsupported document type: {0}")]
    Unsupported(String),
}

/// Supported resume formats, selected by file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Case-insensitive match on `.pdf` / `.docx`. Anything else is `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }
}

/// Reads the whole document at `path` into one string.
pub fn read_document(path: &Path) -> Result<String, ReadError> {
    let kind = DocumentKind::from_path(path)
        .ok_or_else(|| ReadError::Unsupported(path.display().to_string()))?;
    let bytes = std::fs::read(path)?;

    let text = match kind {
        DocumentKind::Pdf => read_pdf(&bytes)?,
        DocumentKind::Docx => read_docx(&bytes)?,
    };

    if text.trim().is_empty() {
        warn!("No text extracted from {}", path.display());
    }
    Ok(text)
}

/// Extracts text page by page. A page that fails to extract contributes
/// nothing; only a document that cannot be loaded at all is an error.
pub fn read_pdf(bytes: &[u8]) -> Result<String, ReadError> {
    let doc = lopdf::Document::load_mem(bytes)?;

    let mut text = String::new();
    for page_num in doc.get_pages().keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => warn!("Failed to extract text from page {page_num}: {e}"),
        }
    }

    if text.trim().is_empty() {
        // lopdf cannot decode every font encoding; pdf-extract handles more of them.
        match pdf_extract::extract_text_from_mem(bytes) {
            Ok(fallback) => {
                debug!("pdf-extract fallback produced {} chars", fallback.len());
                return Ok(fallback);
            }
            Err(e) => warn!("pdf-extract fallback failed: {e}"),
        }
    }

    Ok(text)
}

/// Joins the text of every top-level paragraph with newlines.
pub fn read_docx(bytes: &[u8]) -> Result<String, ReadError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ReadError::Docx(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&paragraph.children, &mut text);
    text
}

/// Hyperlinks and tracked insertions nest runs; their text is part of the paragraph.
fn push_children_text(children: &[docx_rs::ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            docx_rs::ParagraphChild::Run(run) => push_run_text(run, text),
            docx_rs::ParagraphChild::Hyperlink(link) => push_children_text(&link.children, text),
            docx_rs::ParagraphChild::Insert(insert) => {
                for insert_child in &insert.children {
                    if let docx_rs::InsertChild::Run(run) = insert_child {
                        push_run_text(run, text);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run_text(run: &docx_rs::Run, text: &mut String) {
    for run_child in &run.children {
        match run_child {
            docx_rs::RunChild::Text(t) => text.push_str(&t.text),
            docx_rs::RunChild::Tab(_) => text.push('\t'),
            docx_rs::RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use std::io::Cursor;
    use tempfile::TempDir;

    /// Builds a PDF with one page per entry in `pages`, each drawing its text.
    pub(crate) fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let contents = pages
            .iter()
            .map(|text| Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            })
            .collect();
        build_pdf_from_contents(contents)
    }

    /// Builds a PDF with one page per content stream, sharing a Courier `F1` font.
    fn build_pdf_from_contents(contents: Vec<Content>) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for content in contents {
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    /// Builds a DOCX with one paragraph per entry in `paragraphs`.
    pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = docx_rs::Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(
                docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(*text)),
            );
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_document_kind_is_case_insensitive() {
        assert_eq!(
            DocumentKind::from_path(Path::new("CV.PDF")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("cv.Docx")),
            Some(DocumentKind::Docx)
        );
    }

    #[test]
    fn test_document_kind_rejects_other_suffixes() {
        assert_eq!(DocumentKind::from_path(Path::new("resume.txt")), None);
        assert_eq!(DocumentKind::from_path(Path::new("resume.doc")), None);
        assert_eq!(DocumentKind::from_path(Path::new("pdf")), None);
    }

    #[test]
    fn test_read_pdf_concatenates_pages() {
        let bytes = build_pdf(&["Jane Doe", "jane@example.com"]);
        let text = read_pdf(&bytes).unwrap();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("jane@example.com"));
        assert!(text.find("Jane Doe") < text.find("jane@example.com"));
    }

    #[test]
    fn test_read_pdf_rejects_garbage() {
        assert!(matches!(
            read_pdf(b"%PDF-nonsense"),
            Err(ReadError::Pdf(_))
        ));
    }

    #[test]
    fn test_read_docx_joins_paragraphs_with_newlines() {
        let bytes = build_docx(&["Jane Doe", "Rust, Go"]);
        assert_eq!(read_docx(&bytes).unwrap(), "Jane Doe\nRust, Go");
    }

    #[test]
    fn test_read_pdf_drops_unreadable_page() {
        let good = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Tj", vec![Object::string_literal("Jane Doe")]),
                Operation::new("ET", vec![]),
            ],
        };
        // `Tf` without a font operand fails text extraction for this page.
        let broken = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![]),
                Operation::new("Tj", vec![Object::string_literal("lost")]),
                Operation::new("ET", vec![]),
            ],
        };
        let bytes = build_pdf_from_contents(vec![broken, good]);

        let text = read_pdf(&bytes).unwrap();
        assert!(text.contains("Jane Doe"));
        assert!(!text.contains("lost"));
    }

    #[test]
    fn test_read_pdf_without_text_falls_back_and_stays_ok() {
        let bytes = build_pdf(&["", ""]);
        let text = read_pdf(&bytes).unwrap();
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_read_docx_keeps_hyperlink_text() {
        let link = docx_rs::Hyperlink::new(
            "https://linkedin.com/in/janedoe",
            docx_rs::HyperlinkType::External,
        )
        .add_run(docx_rs::Run::new().add_text("linkedin.com/in/janedoe"));
        let docx = docx_rs::Docx::new()
            .add_paragraph(
                docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("Jane Doe")),
            )
            .add_paragraph(
                docx_rs::Paragraph::new()
                    .add_run(docx_rs::Run::new().add_text("LinkedIn: "))
                    .add_hyperlink(link),
            );
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();

        let text = read_docx(&cursor.into_inner()).unwrap();
        assert_eq!(text, "Jane Doe\nLinkedIn: linkedin.com/in/janedoe");
    }

    #[test]
    fn test_read_docx_keeps_inserted_runs_and_breaks() {
        let docx = docx_rs::Docx::new().add_paragraph(
            docx_rs::Paragraph::new()
                .add_run(
                    docx_rs::Run::new()
                        .add_text("Rust")
                        .add_break(docx_rs::BreakType::TextWrapping),
                )
                .add_insert(docx_rs::Insert::new(docx_rs::Run::new().add_text("Go"))),
        );
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();

        let text = read_docx(&cursor.into_inner()).unwrap();
        assert_eq!(text, "Rust\nGo");
    }

    #[test]
    fn test_read_docx_rejects_garbage() {
        assert!(matches!(read_docx(b"not a docx"), Err(ReadError::Docx(_))));
    }

    #[test]
    fn test_read_document_dispatches_on_suffix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Resume.DOCX");
        std::fs::write(&path, build_docx(&["Jane Doe"])).unwrap();

        assert_eq!(read_document(&path).unwrap(), "Jane Doe");
    }

    #[test]
    fn test_read_document_unsupported_suffix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Jane Doe").unwrap();

        assert!(matches!(
            read_document(&path),
            Err(ReadError::Unsupported(_))
        ));
    }

    #[test]
    fn test_read_document_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_document(&dir.path().join("gone.pdf")).unwrap_err();
        assert!(matches!(err, ReadError::Io(_)));
    }
}
