//! Stored proposals.

use super::{FacadeError, SessionFacade};
use consent_domain::{Proposal, ProposalStatus, QuestionType, SessionHandle, StoredEntity, Topic};
use tracing::debug;

impl SessionFacade {
    /// Store a proposal and refresh the topic's proposal cache
    pub fn save_proposal(&self, handle: &SessionHandle, proposal: Proposal) -> Result<Proposal, FacadeError> {
        self.store.upsert(&proposal)?;
        self.refresh_proposal_cache(handle, proposal.question_type)?;
        debug!(
            "Stored proposal {} for {} ({} variants)",
            proposal.id,
            proposal.question_type,
            proposal.variants.len()
        );
        Ok(proposal)
    }

    fn refresh_proposal_cache(&self, handle: &SessionHandle, question: QuestionType) -> Result<(), FacadeError> {
        let proposals = self.proposals_for(handle, question)?;
        self.update_flow_state(handle, |state| {
            state.sub_step_mut(Topic::for_question(question)).set_proposals(proposals);
            Ok(())
        })
    }

    pub fn proposals(&self, handle: &SessionHandle) -> Result<Vec<Proposal>, FacadeError> {
        Ok(self.store.list(handle.id())?)
    }

    pub fn proposals_for(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
    ) -> Result<Vec<Proposal>, FacadeError> {
        Ok(self
            .proposals(handle)?
            .into_iter()
            .filter(|p| p.question_type == question)
            .collect())
    }

    /// The most recent proposal for a question
    pub fn latest_proposal(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
    ) -> Result<Option<Proposal>, FacadeError> {
        Ok(self
            .proposals_for(handle, question)?
            .into_iter()
            .max_by_key(|p| p.created_at))
    }

    /// Find a proposal by full id or unique id prefix
    pub fn proposal(&self, handle: &SessionHandle, proposal_id: &str) -> Result<Proposal, FacadeError> {
        let mut matches: Vec<Proposal> = self
            .proposals(handle)?
            .into_iter()
            .filter(|p| p.id.starts_with(proposal_id))
            .collect();
        match matches.len() {
            1 => Ok(matches.remove(0)),
            _ => matches
                .into_iter()
                .find(|p| p.id == proposal_id)
                .ok_or_else(|| FacadeError::ProposalNotFound(proposal_id.to_string())),
        }
    }

    /// Hand-edit the text of a variant before voting
    pub fn edit_variant_text(
        &self,
        handle: &SessionHandle,
        proposal_id: &str,
        variant_id: &str,
        text: &str,
    ) -> Result<Proposal, FacadeError> {
        let mut proposal = self.proposal(handle, proposal_id)?;
        if !proposal.edit_variant_text(variant_id, text.trim()) {
            return Err(FacadeError::VariantNotFound {
                proposal: proposal.id,
                variant: variant_id.to_string(),
            });
        }
        self.save_proposal(handle, proposal)
    }

    pub fn update_proposal_status(
        &self,
        handle: &SessionHandle,
        proposal_id: &str,
        status: ProposalStatus,
        approved_variant_id: Option<String>,
    ) -> Result<Proposal, FacadeError> {
        let mut proposal = self.proposal(handle, proposal_id)?;
        proposal.update_status(status, approved_variant_id);
        debug!("Proposal {} is now {}", proposal.key(), status);
        self.save_proposal(handle, proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::facade;
    use super::*;
    use consent_domain::{ProposalSet, SubStepStatus};

    #[test]
    fn test_save_and_edit() {
        let facade = facade();
        let handle = facade.create_session("s").unwrap().session.handle();
        let proposal = facade
            .save_proposal(
                &handle,
                Proposal::new(handle.id(), QuestionType::Stakeholders, ProposalSet::placeholder()),
            )
            .unwrap();

        let state = facade.flow_state(&handle).unwrap();
        assert_eq!(state.sub_step(Topic::VisieStakeholders).status, SubStepStatus::Voting);

        let edited = facade
            .edit_variant_text(&handle, &proposal.id, "variant-1", "Nieuwe tekst")
            .unwrap();
        assert_eq!(edited.variant("variant-1").unwrap().text, "Nieuwe tekst");
        assert_eq!(facade.proposals(&handle).unwrap().len(), 1);

        assert!(matches!(
            facade.edit_variant_text(&handle, &proposal.id, "variant-7", "x"),
            Err(FacadeError::VariantNotFound { .. })
        ));
    }

    #[test]
    fn test_status_update_records_approval() {
        let facade = facade();
        let handle = facade.create_session("s").unwrap().session.handle();
        let proposal = facade
            .save_proposal(
                &handle,
                Proposal::new(handle.id(), QuestionType::Goal1, ProposalSet::placeholder()),
            )
            .unwrap();
        let approved = facade
            .update_proposal_status(&handle, &proposal.id, ProposalStatus::Approved, Some("variant-3".into()))
            .unwrap();
        assert!(approved.approved_at.is_some());
        assert_eq!(
            facade.latest_proposal(&handle, QuestionType::Goal1).unwrap().unwrap().status,
            ProposalStatus::Approved
        );
    }
}
