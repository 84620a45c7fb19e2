//! Document text extraction for Tutora
//!
//! This module defines the extractor boundary that converts raw document
//! bytes into plain text for ingestion into a session, along with the PDF
//! implementation used by the CLI.

use crate::error::{Result, TutoraError};

/// Converts a page-oriented document's raw bytes into plain text
///
/// Implementations return the concatenated text of all pages in page order.
pub trait DocumentExtractor: Send + Sync {
    /// Extracts the full plain text from `bytes`
    ///
    /// # Errors
    ///
    /// Returns `Extraction` if the payload cannot be parsed as the expected
    /// document format.
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// PDF text extractor
///
/// # Examples
///
/// ```
/// use tutora::extract::{DocumentExtractor, PdfExtractor};
///
/// let extractor = PdfExtractor::new();
/// assert!(extractor.extract(b"not a pdf").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Creates a new PDF extractor
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| TutoraError::Extraction(format!("Failed to parse PDF: {}", e)))?;

        tracing::debug!(chars = text.len(), "Extracted PDF text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bytes_fail_with_extraction_error() {
        let extractor = PdfExtractor::new();
        let err = extractor.extract(b"plain text, not a PDF").unwrap_err();
        let err = err.downcast::<TutoraError>().unwrap();
        assert!(matches!(err, TutoraError::Extraction(_)));
    }

    #[test]
    fn test_empty_bytes_fail() {
        let extractor = PdfExtractor::new();
        assert!(extractor.extract(&[]).is_err());
    }

    #[test]
    fn test_extractor_as_trait_object() {
        struct FixedExtractor;

        impl DocumentExtractor for FixedExtractor {
            fn extract(&self, _bytes: &[u8]) -> Result<String> {
                Ok("page one page two".to_string())
            }
        }

        let extractor: Box<dyn DocumentExtractor> = Box::new(FixedExtractor);
        assert_eq!(extractor.extract(&[1, 2, 3]).unwrap(), "page one page two");
    }
}
