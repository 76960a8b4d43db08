//! Plain-text and Markdown canvases

use consent_application::ports::document_extractor::{DocumentTextExtractor, ImportError};

const EXTENSIONS: [&str; 3] = ["txt", "md", "markdown"];

/// Reads UTF-8 text, tolerating a byte-order mark and CRLF line endings
pub struct PlainTextExtractor;

impl DocumentTextExtractor for PlainTextExtractor {
    fn extensions(&self) -> &[&'static str] {
        &EXTENSIONS
    }

    fn extract_text(&self, bytes: &[u8]) -> Result<String, ImportError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let text = std::str::from_utf8(bytes).map_err(|e| ImportError::Unreadable(e.to_string()))?;
        Ok(text.replace("\r\n", "\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        let extractor = PlainTextExtractor;
        assert!(extractor.supports("canvas.txt"));
        assert!(extractor.supports("Canvas.MD"));
        assert!(!extractor.supports("canvas.docx"));
        assert!(!extractor.supports("README"));
    }

    #[test]
    fn test_bom_and_line_endings() {
        let text = PlainTextExtractor
            .extract_text(b"\xEF\xBB\xBFA. Huidige situatie\r\nSilo's\r\n")
            .unwrap();
        assert_eq!(text, "A. Huidige situatie\nSilo's\n");
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            PlainTextExtractor.extract_text(&[0xff, 0xfe, 0x00]),
            Err(ImportError::Unreadable(_))
        ));
    }
}
