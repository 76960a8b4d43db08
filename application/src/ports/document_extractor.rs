//! Document text extraction port

use std::path::Path;
use thiserror::Error;

/// Why an upload was rejected. A rejected document is never stored.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Document is empty or could not be read")]
    Empty,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not read document: {0}")]
    Unreadable(String),
}

/// Reads raw text out of an uploaded document
pub trait DocumentTextExtractor: Send + Sync {
    /// Lower-case extensions this extractor accepts, without the dot
    fn extensions(&self) -> &[&'static str];

    fn extract_text(&self, bytes: &[u8]) -> Result<String, ImportError>;

    fn supports(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                self.extensions().iter().any(|e| *e == ext)
            })
    }
}
