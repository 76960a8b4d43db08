//! Final document and whole-session export.

use super::{FacadeError, SessionExport, SessionFacade};
use crate::ports::audit_log::AuditEvent;
use consent_domain::{ApprovedText, FinalDocument, SessionHandle};
use serde_json::json;
use tracing::info;

impl SessionFacade {
    /// Assemble the final document from the approved texts; nothing is stored
    pub fn build_final_document(&self, handle: &SessionHandle) -> Result<FinalDocument, FacadeError> {
        self.session(handle)?;
        Ok(FinalDocument::from_approved_texts(handle.id(), &self.approved_texts(handle)?))
    }

    pub fn save_final_document(&self, handle: &SessionHandle, document: &FinalDocument) -> Result<(), FacadeError> {
        if document.session_id != handle.id() {
            return Err(FacadeError::SessionMismatch {
                expected: handle.id().to_string(),
                found: document.session_id.clone(),
            });
        }
        self.store.upsert(document)?;
        self.touch(handle)
    }

    pub fn final_document(&self, handle: &SessionHandle) -> Result<Option<FinalDocument>, FacadeError> {
        Ok(self.store.get(handle.id())?)
    }

    /// Load a previously exported document back into a session as approved texts.
    ///
    /// Each text goes through the normal approval path, so the affected
    /// topics end up approved.
    pub fn import_final_document(
        &self,
        handle: &SessionHandle,
        document: &FinalDocument,
    ) -> Result<Vec<ApprovedText>, FacadeError> {
        let mut imported = Vec::new();
        for text in document.to_approved_texts(handle.id()) {
            imported.push(self.save_approved_text(
                handle,
                text.question_type,
                &text.text,
                &text.based_on_proposal_id,
                &text.based_on_variant_id,
            )?);
        }
        info!("Imported {} approved texts into {}", imported.len(), handle);
        self.audit.log(AuditEvent::new(
            "document_imported",
            json!({ "session_id": handle.id(), "texts": imported.len() }),
        ));
        Ok(imported)
    }

    /// Every stored entity of the session
    pub fn export_session_data(&self, handle: &SessionHandle) -> Result<SessionExport, FacadeError> {
        Ok(SessionExport {
            session: self.session(handle)?,
            documents: self.documents(handle)?,
            analyses: self.analyses(handle)?,
            proposals: self.proposals(handle)?,
            votes: self.get_votes_by_session(handle)?,
            approved_texts: self.approved_texts(handle)?,
            final_document: self.final_document(handle)?,
            flow_state: self.flow_state(handle)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{document, facade};
    use super::*;
    use consent_domain::{FlowStep, QuestionType};

    #[test]
    fn test_build_and_save() {
        let facade = facade();
        let handle = facade.create_session("s").unwrap().session.handle();
        facade
            .save_approved_text(&handle, QuestionType::CurrentSituation, "Nu", "p", "v")
            .unwrap();
        facade
            .save_approved_text(&handle, QuestionType::Goal1, "Klant centraal", "cluster", "c1")
            .unwrap();

        let doc = facade.build_final_document(&handle).unwrap();
        assert_eq!(doc.vision.current_situation, "Nu");
        assert_eq!(doc.goals.len(), 1);
        assert!(!doc.is_complete());
        assert!(facade.final_document(&handle).unwrap().is_none());

        facade.save_final_document(&handle, &doc).unwrap();
        assert_eq!(facade.final_document(&handle).unwrap().unwrap().id, doc.id);
    }

    #[test]
    fn test_import_into_fresh_session() {
        let facade = facade();
        let source = facade.create_session("bron").unwrap().session.handle();
        for (q, text) in [
            (QuestionType::CurrentSituation, "Nu"),
            (QuestionType::DesiredSituation, "Straks"),
            (QuestionType::ChangeDirection, "Beweging"),
            (QuestionType::Stakeholders, "Iedereen"),
            (QuestionType::Goal1, "Doel"),
        ] {
            facade.save_approved_text(&source, q, text, "p", "v").unwrap();
        }
        let doc = facade.build_final_document(&source).unwrap();

        let target = facade.create_session("doel").unwrap().session.handle();
        let imported = facade.import_final_document(&target, &doc).unwrap();
        assert_eq!(imported.len(), 5);
        let state = facade.flow_state(&target).unwrap();
        assert!(state.status(FlowStep::VisieStakeholders).is_completed());
        assert!(state.status(FlowStep::Doelen).is_completed());
        assert!(!state.status(FlowStep::Scope).is_completed());
    }

    #[test]
    fn test_export_bundle() {
        let facade = facade();
        let handle = facade.create_session("s").unwrap().session.handle();
        facade.add_document(&handle, document(&handle, "anne", &[])).unwrap();
        let export = facade.export_session_data(&handle).unwrap();
        assert_eq!(export.documents.len(), 1);
        assert!(export.final_document.is_none());

        let json = serde_json::to_value(&export).unwrap();
        assert!(json.get("approvedTexts").is_some());
        assert!(json.get("flowState").is_some());
    }
}
