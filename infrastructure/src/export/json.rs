//! Lossless JSON export

use consent_application::ports::exporter::{DocumentExporter, ExportError};
use consent_domain::FinalDocument;

pub struct JsonExporter;

impl DocumentExporter for JsonExporter {
    fn format(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn export(&self, document: &FinalDocument) -> Result<Vec<u8>, ExportError> {
        serde_json::to_vec_pretty(document).map_err(|e| ExportError::Serialization(e.to_string()))
    }

    fn import(&self, bytes: &[u8]) -> Result<FinalDocument, ExportError> {
        serde_json::from_slice(bytes).map_err(|e| ExportError::InvalidDocument(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_domain::{ApprovedText, QuestionType};

    #[test]
    fn test_export_reimports_identically() {
        let texts = vec![
            ApprovedText::new("s", QuestionType::Stakeholders, "Iedereen", "p", "v"),
            ApprovedText::new("s", QuestionType::Goal2, "Groei", "cluster", "c2"),
            ApprovedText::new("s", QuestionType::OutOfScope, "• HR\n• IT", "scope", "scope-final"),
        ];
        let mut document = FinalDocument::from_approved_texts("s", &texts);
        document.mark_exported();

        let bytes = JsonExporter.export(&document).unwrap();
        let back = JsonExporter.import(&bytes).unwrap();
        assert_eq!(back, document);
        assert_eq!(back.scope.out_of_scope, vec!["HR", "IT"]);
    }

    #[test]
    fn test_invalid_import() {
        assert!(matches!(
            JsonExporter.import(b"[]"),
            Err(ExportError::InvalidDocument(_))
        ));
    }
}
