//! Approved texts.

use super::{FacadeError, SessionFacade};
use crate::ports::audit_log::AuditEvent;
use consent_domain::{ApprovedText, QuestionType, SessionHandle, Topic};
use serde_json::json;
use tracing::info;

impl SessionFacade {
    /// Record the approved wording for a question, replacing any earlier one.
    ///
    /// The topic is marked approved and its step completed once all of its
    /// questions have an approved text (`goal_1` is enough for doelen). The
    /// current step does not move.
    pub fn save_approved_text(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
        text: &str,
        proposal_ref: &str,
        variant_ref: &str,
    ) -> Result<ApprovedText, FacadeError> {
        let approved = ApprovedText::new(handle.id(), question, text.trim(), proposal_ref, variant_ref);
        self.store.upsert(&approved)?;

        let questions: Vec<QuestionType> = self
            .approved_texts(handle)?
            .iter()
            .map(|t| t.question_type)
            .collect();
        let topic = Topic::for_question(question);
        let primary = topic.question_types().first().copied() == Some(question);
        let text = approved.text.clone();
        let variant = variant_ref.to_string();
        self.update_flow_state(handle, |state| {
            state.reconcile_with_approved_texts(&questions);
            if primary {
                state.sub_step_mut(topic).approve(text, Some(variant));
            }
            Ok(())
        })?;

        info!("Approved {} for session {}", question, handle);
        self.audit.log(AuditEvent::new(
            "text_approved",
            json!({
                "session_id": handle.id(),
                "question_type": question.as_str(),
                "proposal_id": proposal_ref,
                "variant_id": variant_ref,
            }),
        ));
        Ok(approved)
    }

    pub fn approved_text(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
    ) -> Result<Option<ApprovedText>, FacadeError> {
        Ok(self.store.get(&format!("{}/{}", handle.id(), question))?)
    }

    /// Remove an approved text; used when a shorter goal ranking replaces a longer one
    pub(super) fn remove_approved_text(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
    ) -> Result<bool, FacadeError> {
        Ok(self
            .store
            .delete::<ApprovedText>(&format!("{}/{}", handle.id(), question))?)
    }
}
