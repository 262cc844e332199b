//! PDF loading.
//!
//! Text extraction is fully delegated to the `pdf-extract` crate; the only
//! local logic is reading the bytes and rejecting documents that yield no
//! text at all (scanned images, encrypted files). Unsupported or corrupt
//! formats surface as the library's parse error.

use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// A loaded document: where it came from and the extracted text.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path the document was read from.
    pub source: PathBuf,

    /// Full extracted text, in page order.
    pub text: String,
}

/// Read a PDF from disk and extract its text.
///
/// # Errors
/// - I/O failures reading the file.
/// - Parse failures from the PDF library (unsupported or corrupt format).
/// - The document produced no extractable text.
pub fn load_document(path: &Path) -> Result<Document, Box<dyn Error>> {
    let bytes = fs::read(path)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| format!("Failed to extract text from {}: {e}", path.display()))?;

    if text.trim().is_empty() {
        return Err(format!("No extractable text in {}", path.display()).into());
    }

    Ok(Document {
        source: path.to_path_buf(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_document_missing_file() {
        let result = load_document(Path::new("non/existent/file.pdf"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_document_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_pdf.pdf");
        fs::write(&path, b"this is plain text, not a pdf").unwrap();

        let result = load_document(&path);
        assert!(result.is_err());
    }
}
