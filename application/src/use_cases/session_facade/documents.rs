//! Respondent documents.

use super::{FacadeError, SessionFacade};
use crate::ports::audit_log::AuditEvent;
use consent_domain::{Document, QuestionType, SessionHandle, StoredEntity};
use serde_json::json;
use tracing::{debug, info};

impl SessionFacade {
    pub fn add_document(&self, handle: &SessionHandle, document: Document) -> Result<Document, FacadeError> {
        if document.session_id != handle.id() {
            return Err(FacadeError::SessionMismatch {
                expected: handle.id().to_string(),
                found: document.session_id,
            });
        }
        self.session(handle)?;
        self.store.create(&document)?;
        self.touch(handle)?;

        info!(
            "Added document {} for respondent {} ({} answers)",
            document.filename,
            document.respondent_id,
            document.parsed_responses.answered()
        );
        self.audit.log(AuditEvent::new(
            "document_added",
            json!({
                "session_id": handle.id(),
                "document_id": document.id,
                "respondent_id": document.respondent_id,
                "filename": document.filename,
            }),
        ));
        Ok(document)
    }

    pub fn documents(&self, handle: &SessionHandle) -> Result<Vec<Document>, FacadeError> {
        Ok(self.store.list(handle.id())?)
    }

    /// Find a document by full id or unique id prefix
    pub fn document(&self, handle: &SessionHandle, document_id: &str) -> Result<Document, FacadeError> {
        let mut matches: Vec<Document> = self
            .documents(handle)?
            .into_iter()
            .filter(|d| d.id.starts_with(document_id))
            .collect();
        match matches.len() {
            1 => Ok(matches.remove(0)),
            _ => matches
                .into_iter()
                .find(|d| d.id == document_id)
                .ok_or_else(|| FacadeError::DocumentNotFound(document_id.to_string())),
        }
    }

    /// Manual correction of one extracted answer
    pub fn update_document_response(
        &self,
        handle: &SessionHandle,
        document_id: &str,
        question: QuestionType,
        answer: &str,
    ) -> Result<Document, FacadeError> {
        let mut document = self.document(handle, document_id)?;
        document.set_answer(question, answer.trim());
        self.store.upsert(&document)?;
        self.touch(handle)?;
        debug!("Updated {} of document {}", question, document.id);
        Ok(document)
    }

    pub fn remove_document(&self, handle: &SessionHandle, document_id: &str) -> Result<Document, FacadeError> {
        let document = self.document(handle, document_id)?;
        self.store.delete::<Document>(&document.key())?;
        self.touch(handle)?;
        info!("Removed document {} from session {}", document.filename, handle);
        Ok(document)
    }

    /// Respondents expected to vote: one per uploaded document
    pub fn respondents(&self, handle: &SessionHandle) -> Result<Vec<String>, FacadeError> {
        let mut respondents: Vec<String> = Vec::new();
        for doc in self.documents(handle)? {
            if !respondents.contains(&doc.respondent_id) {
                respondents.push(doc.respondent_id);
            }
        }
        Ok(respondents)
    }
}
