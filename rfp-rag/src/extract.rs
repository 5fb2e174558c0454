//! Text extraction from uploaded files.
//!
//! PDFs are decoded with `pdf-extract` (feature `pdf`); `.txt` files are read
//! as UTF-8. The extracted text is normalised so layout whitespace does not
//! inflate chunk counts: runs of spaces and single line breaks collapse to one
//! space, blank lines survive as paragraph breaks.

use std::path::Path;

use crate::error::{RagError, Result};

/// Kinds of upload the ingestion path understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A PDF document.
    Pdf,
    /// A UTF-8 plain-text document.
    Text,
}

impl SourceKind {
    /// Infer the kind from a file name's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(SourceKind::Pdf),
            "txt" => Some(SourceKind::Text),
            _ => None,
        }
    }
}

/// Extract and normalise the text of an uploaded file.
///
/// # Errors
///
/// Returns [`RagError::ExtractionError`] when the extension is unsupported,
/// the bytes cannot be decoded, or PDF support was not compiled in.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String> {
    let kind = SourceKind::from_filename(filename).ok_or_else(|| RagError::ExtractionError {
        source_name: filename.to_string(),
        message: "only .pdf and .txt files are supported".to_string(),
    })?;

    let raw = match kind {
        SourceKind::Pdf => extract_pdf(filename, bytes)?,
        SourceKind::Text => String::from_utf8(bytes.to_vec()).map_err(|e| {
            RagError::ExtractionError {
                source_name: filename.to_string(),
                message: format!("file is not valid UTF-8: {e}"),
            }
        })?,
    };

    Ok(clean_text(&raw))
}

#[cfg(feature = "pdf")]
fn extract_pdf(filename: &str, bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| RagError::ExtractionError {
        source_name: filename.to_string(),
        message: format!("failed to read PDF: {e}"),
    })
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(filename: &str, _bytes: &[u8]) -> Result<String> {
    Err(RagError::ExtractionError {
        source_name: filename.to_string(),
        message: "PDF support is not enabled in this build".to_string(),
    })
}

/// Collapse layout whitespace while keeping paragraph breaks.
pub fn clean_text(text: &str) -> String {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
            continue;
        }
        current.extend(line.split_whitespace());
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs.join("\n\n")
}
