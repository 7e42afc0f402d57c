//! Plain-text extraction from uploaded candidate documents.
//!
//! Uploaded bytes are spooled to a named temp file for the PDF backend;
//! the file is removed when the handle drops, so nothing an applicant
//! uploads outlives its request.

use std::io::Write;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type '.{0}' (expected .pdf or .txt)")]
    UnsupportedExtension(String),

    #[error("filename has no extension")]
    MissingExtension,

    #[error("failed to spool upload to a temporary file: {0}")]
    Spool(#[from] std::io::Error),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),
}

/// Supported upload formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Txt,
}

impl DocumentFormat {
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .ok_or(ExtractError::MissingExtension)?;
        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "txt" => Ok(DocumentFormat::Txt),
            other => Err(ExtractError::UnsupportedExtension(other.to_string())),
        }
    }
}

/// Reduces an uploaded file to plain text based on its extension.
pub fn extract_text(filename: &str, data: &[u8]) -> Result<String, ExtractError> {
    match DocumentFormat::from_filename(filename)? {
        DocumentFormat::Txt => Ok(String::from_utf8_lossy(data).into_owned()),
        DocumentFormat::Pdf => extract_pdf(data),
    }
}

fn extract_pdf(data: &[u8]) -> Result<String, ExtractError> {
    let mut spool = tempfile::NamedTempFile::new()?;
    spool.write_all(data)?;
    spool.flush()?;
    pdf_extract::extract_text(spool.path()).map_err(|e| ExtractError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection_is_case_insensitive() {
        assert_eq!(
            DocumentFormat::from_filename("resume.PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_filename("notes.txt").unwrap(),
            DocumentFormat::Txt
        );
    }

    #[test]
    fn test_format_detection_uses_last_extension() {
        assert_eq!(
            DocumentFormat::from_filename("jane.doe.resume.txt").unwrap(),
            DocumentFormat::Txt
        );
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        assert!(matches!(
            DocumentFormat::from_filename("resume.docx"),
            Err(ExtractError::UnsupportedExtension(ext)) if ext == "docx"
        ));
        assert!(matches!(
            DocumentFormat::from_filename("resume"),
            Err(ExtractError::MissingExtension)
        ));
    }

    #[test]
    fn test_txt_extraction_is_lossy_utf8() {
        let text = extract_text("resume.txt", b"Python developer").unwrap();
        assert_eq!(text, "Python developer");

        // Invalid UTF-8 degrades to replacement characters, never an error.
        let lossy = extract_text("resume.txt", &[0x50, 0xff, 0x51]).unwrap();
        assert!(lossy.starts_with('P'));
        assert!(lossy.ends_with('Q'));
    }

    #[test]
    fn test_broken_pdf_reports_extraction_error() {
        let err = extract_text("resume.pdf", b"this is not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
