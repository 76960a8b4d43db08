//! Final-document exporter port

use consent_domain::FinalDocument;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("No exporter for format: {0}")]
    UnknownFormat(String),

    #[error("Not a valid exported document: {0}")]
    InvalidDocument(String),
}

/// Serializes a [`FinalDocument`] into a downloadable byte stream. Stateless.
pub trait DocumentExporter: Send + Sync {
    /// Format name used to select the exporter (e.g. `json`, `markdown`)
    fn format(&self) -> &'static str;

    fn extension(&self) -> &'static str;

    fn export(&self, document: &FinalDocument) -> Result<Vec<u8>, ExportError>;

    /// Read a document back, for formats that support it
    fn import(&self, _bytes: &[u8]) -> Result<FinalDocument, ExportError> {
        Err(ExportError::UnknownFormat(format!(
            "{} cannot be re-imported",
            self.format()
        )))
    }
}
