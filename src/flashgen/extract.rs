//! Reading study material from disk.
//!
//! Plain-text formats are read as UTF-8; PDFs go through `pdf-extract`.
//! Image-only or encrypted PDFs yield no text and are reported as such.

use crate::error::{FlashError, Result};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Text,
    Pdf,
}

impl SourceKind {
    /// Detects the source kind from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if ext == "pdf" {
            Ok(SourceKind::Pdf)
        } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            Ok(SourceKind::Text)
        } else {
            Err(FlashError::Extraction(format!(
                "Unsupported file type for {} (expected .txt, .md or .pdf)",
                path.display()
            )))
        }
    }
}

/// Loads raw text from a file, dispatching on its extension.
pub fn load_source(path: &Path) -> Result<String> {
    let kind = SourceKind::from_path(path)?;
    debug!(path = %path.display(), ?kind, "loading source");

    match kind {
        SourceKind::Text => Ok(fs::read_to_string(path)?),
        SourceKind::Pdf => {
            let bytes = fs::read(path)?;
            pdf_text(&bytes)
        }
    }
}

/// Reads all of `reader` as UTF-8 text (used for stdin).
pub fn read_all<R: Read>(mut reader: R) -> Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(buf)
}

fn pdf_text(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| FlashError::Extraction(format!("Failed to extract PDF text: {}", e)))?;
    if text.trim().is_empty() {
        return Err(FlashError::Extraction(
            "No text could be extracted from the PDF (image-based or protected?)".to_string(),
        ));
    }
    Ok(text)
}
