//! Document text extraction. Turns an uploaded file into plain text for the engine.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::debug;

/// Upload size limit for résumé files.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const PDF: &str = "application/pdf";
const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const PLAIN_TEXT: &str = "text/plain";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Resolves the declared media type, falling back to the file extension
    /// when the client sent a generic type such as `application/octet-stream`.
    pub fn detect(media_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        let essence = media_type
            .map(|m| m.split(';').next().unwrap_or(m).trim().to_ascii_lowercase());

        match essence.as_deref() {
            Some(PDF) => return Some(Self::Pdf),
            Some(DOCX) => return Some(Self::Docx),
            Some(PLAIN_TEXT) => return Some(Self::PlainText),
            _ => {}
        }

        let extension = file_name?.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid file type. Only PDF, DOCX and TXT files are allowed.")]
    UnsupportedMediaType,

    #[error("Failed to extract text from DOCX: {0}")]
    Docx(String),

    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("No text content found in the file")]
    Empty,
}

/// Extracts plain text. Fails with `Empty` when nothing but whitespace remains.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
    let text = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?,
        DocumentKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
        DocumentKind::Docx => extract_docx_text(bytes)?,
    };

    debug!("Extracted {} characters from {:?}", text.len(), kind);

    if text.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }
    Ok(text)
}

/// Main document part inside a DOCX (OOXML) zip container.
const DOCX_BODY_PART: &str = "word/document.xml";

/// Raw text of a DOCX body: the contents of `w:t` runs, with tabs and breaks
/// kept and a blank line after every paragraph.
fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(docx_error)?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(docx_error)?
        .read_to_string(&mut xml)
        .map_err(docx_error)?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event().map_err(docx_error)? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push_str("\n\n"),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => {
                text.push_str(&t.unescape().map_err(docx_error)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

fn docx_error(e: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::Docx(e.to_string())
}
