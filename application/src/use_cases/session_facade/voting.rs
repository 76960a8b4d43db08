//! Consent voting on proposal variants.

use super::{FacadeError, SessionFacade};
use crate::ports::audit_log::AuditEvent;
use consent_domain::{
    ApprovedText, ConsentTally, Proposal, ProposalStatus, SessionHandle, Topic, Vote, VoteResults,
    VoteValue,
};
use serde_json::json;
use tracing::info;

impl SessionFacade {
    /// Record a vote; a repeat vote by the same respondent on the same
    /// variant replaces the earlier one.
    ///
    /// Only respondents with a document in the session may vote. A disagree
    /// vote without a comment is rejected before anything is stored.
    pub fn cast_vote(
        &self,
        handle: &SessionHandle,
        proposal_id: &str,
        variant_id: &str,
        respondent_id: &str,
        value: VoteValue,
        comment: Option<String>,
    ) -> Result<Vote, FacadeError> {
        let proposal = self.proposal(handle, proposal_id)?;
        self.require_variant(&proposal, variant_id)?;
        if !self.respondents(handle)?.iter().any(|r| r == respondent_id) {
            return Err(FacadeError::UnknownRespondent(respondent_id.to_string()));
        }
        let vote = Vote::new(handle.id(), &proposal.id, variant_id, respondent_id, value, comment)?;
        self.store.upsert(&vote)?;

        if proposal.status == ProposalStatus::Draft {
            self.update_proposal_status(handle, &proposal.id, ProposalStatus::Voting, None)?;
        }
        let cached = vote.clone();
        self.update_flow_state(handle, |state| {
            state
                .sub_step_mut(Topic::for_question(proposal.question_type))
                .record_vote(cached);
            Ok(())
        })?;

        info!("{} voted {} on {}/{}", respondent_id, value, proposal.id, variant_id);
        self.audit.log(AuditEvent::new(
            "vote_cast",
            json!({
                "session_id": handle.id(),
                "proposal_id": proposal.id,
                "variant_id": variant_id,
                "respondent_id": respondent_id,
                "value": value.as_str(),
                "comment": vote.comment,
            }),
        ));
        Ok(vote)
    }

    fn require_variant(&self, proposal: &Proposal, variant_id: &str) -> Result<(), FacadeError> {
        if proposal.variant(variant_id).is_none() {
            return Err(FacadeError::VariantNotFound {
                proposal: proposal.id.clone(),
                variant: variant_id.to_string(),
            });
        }
        Ok(())
    }

    /// Votes on a proposal, optionally narrowed to one variant
    pub fn get_votes(
        &self,
        handle: &SessionHandle,
        proposal_id: &str,
        variant_id: Option<&str>,
    ) -> Result<Vec<Vote>, FacadeError> {
        Ok(self
            .get_votes_by_session(handle)?
            .into_iter()
            .filter(|v| v.proposal_id == proposal_id)
            .filter(|v| variant_id.is_none_or(|id| v.variant_id == id))
            .collect())
    }

    pub fn get_votes_by_session(&self, handle: &SessionHandle) -> Result<Vec<Vote>, FacadeError> {
        Ok(self.store.list(handle.id())?)
    }

    /// Votes of current respondents only, with the number of expected voters.
    ///
    /// Votes left behind by a removed document no longer count.
    fn expected_votes(
        &self,
        handle: &SessionHandle,
        proposal_id: &str,
        variant_id: Option<&str>,
    ) -> Result<(usize, Vec<Vote>), FacadeError> {
        let respondents = self.respondents(handle)?;
        let votes = self
            .get_votes(handle, proposal_id, variant_id)?
            .into_iter()
            .filter(|v| respondents.contains(&v.respondent_id))
            .collect();
        Ok((respondents.len(), votes))
    }

    /// Consent tally of one variant; every respondent is an expected voter
    pub fn consent_tally(
        &self,
        handle: &SessionHandle,
        proposal_id: &str,
        variant_id: &str,
    ) -> Result<ConsentTally, FacadeError> {
        let proposal = self.proposal(handle, proposal_id)?;
        self.require_variant(&proposal, variant_id)?;
        let (total, votes) = self.expected_votes(handle, &proposal.id, Some(variant_id))?;
        Ok(ConsentTally::from_votes(total, &votes))
    }

    /// Results for every variant of a proposal
    pub fn vote_results(&self, handle: &SessionHandle, proposal_id: &str) -> Result<Vec<VoteResults>, FacadeError> {
        let proposal = self.proposal(handle, proposal_id)?;
        let (total, votes) = self.expected_votes(handle, &proposal.id, None)?;
        Ok(proposal
            .variants
            .iter()
            .map(|v| VoteResults::for_variant(&proposal.id, &v.id, total, &votes))
            .collect())
    }

    /// Approve a variant's text once consent is reached.
    ///
    /// With `force` the facilitator overrides a missing consent. The override
    /// is recorded in the audit trail.
    pub fn approve_variant(
        &self,
        handle: &SessionHandle,
        proposal_id: &str,
        variant_id: &str,
        force: bool,
    ) -> Result<ApprovedText, FacadeError> {
        let proposal = self.proposal(handle, proposal_id)?;
        let tally = self.consent_tally(handle, &proposal.id, variant_id)?;
        if !tally.is_approved() {
            if !force {
                return Err(FacadeError::ConsentNotReached(tally.status()));
            }
            self.audit.log(AuditEvent::new(
                "consent_overridden",
                json!({
                    "session_id": handle.id(),
                    "proposal_id": proposal.id,
                    "variant_id": variant_id,
                    "status": tally.status().to_string(),
                }),
            ));
        }

        let text = proposal
            .variant(variant_id)
            .map(|v| v.text.clone())
            .unwrap_or_default();
        let approved =
            self.save_approved_text(handle, proposal.question_type, &text, &proposal.id, variant_id)?;
        self.update_proposal_status(
            handle,
            &proposal.id,
            ProposalStatus::Approved,
            Some(variant_id.to_string()),
        )?;
        Ok(approved)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{document, facade};
    use super::*;
    use consent_domain::{ConsentStatus, DomainError, ProposalSet, QuestionType};

    fn setup(respondents: &[&str]) -> (SessionFacade, SessionHandle, Proposal) {
        let facade = facade();
        let handle = facade.create_session("s").unwrap().session.handle();
        for r in respondents {
            facade.add_document(&handle, document(&handle, r, &[])).unwrap();
        }
        let proposal = facade
            .save_proposal(
                &handle,
                Proposal::new(handle.id(), QuestionType::CurrentSituation, ProposalSet::placeholder()),
            )
            .unwrap();
        (facade, handle, proposal)
    }

    #[test]
    fn test_disagree_without_comment_is_rejected() {
        let (facade, handle, proposal) = setup(&["anne"]);
        let result = facade.cast_vote(&handle, &proposal.id, "variant-1", "anne", VoteValue::Disagree, Some("  ".into()));
        assert!(matches!(
            result,
            Err(FacadeError::Domain(DomainError::MissingObjectionComment))
        ));
        assert!(facade.get_votes_by_session(&handle).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        let (facade, handle, proposal) = setup(&["anne"]);
        assert!(matches!(
            facade.cast_vote(&handle, &proposal.id, "variant-9", "anne", VoteValue::Agree, None),
            Err(FacadeError::VariantNotFound { .. })
        ));
    }

    #[test]
    fn test_consent_flow() {
        let (facade, handle, proposal) = setup(&["a", "b", "c", "d"]);
        let vote = |r: &str, value: VoteValue, comment: Option<&str>| {
            facade
                .cast_vote(&handle, &proposal.id, "variant-3", r, value, comment.map(String::from))
                .unwrap();
        };

        vote("a", VoteValue::Agree, None);
        vote("b", VoteValue::Agree, None);
        let tally = facade.consent_tally(&handle, &proposal.id, "variant-3").unwrap();
        assert_eq!(tally.status(), ConsentStatus::Pending);
        assert!(matches!(
            facade.approve_variant(&handle, &proposal.id, "variant-3", false),
            Err(FacadeError::ConsentNotReached(ConsentStatus::Pending))
        ));

        vote("c", VoteValue::Disagree, Some("Te vaag"));
        vote("d", VoteValue::Agree, None);
        assert!(!facade.consent_tally(&handle, &proposal.id, "variant-3").unwrap().is_approved());

        // c changes their mind; the repeat vote replaces the objection
        vote("c", VoteValue::Agree, None);
        let results = facade.vote_results(&handle, &proposal.id).unwrap();
        let v3 = results.iter().find(|r| r.variant_id == "variant-3").unwrap();
        assert_eq!((v3.agree, v3.disagree), (4, 0));
        assert!(v3.is_approved);
        assert_eq!(facade.get_votes(&handle, &proposal.id, Some("variant-3")).unwrap().len(), 4);

        let approved = facade.approve_variant(&handle, &proposal.id, "variant-3", false).unwrap();
        assert_eq!(approved.text, "Gebalanceerde versie.");
        let stored = facade.proposal(&handle, &proposal.id).unwrap();
        assert_eq!(stored.status, ProposalStatus::Approved);
        assert_eq!(stored.approved_variant_id.as_deref(), Some("variant-3"));
    }

    #[test]
    fn test_vote_from_unknown_respondent_is_rejected() {
        let (facade, handle, proposal) = setup(&["a", "b", "c", "d"]);
        for r in ["a", "b", "c"] {
            facade
                .cast_vote(&handle, &proposal.id, "variant-1", r, VoteValue::Agree, None)
                .unwrap();
        }
        assert!(matches!(
            facade.cast_vote(&handle, &proposal.id, "variant-1", "typo", VoteValue::Agree, None),
            Err(FacadeError::UnknownRespondent(r)) if r == "typo"
        ));

        let tally = facade.consent_tally(&handle, &proposal.id, "variant-1").unwrap();
        assert_eq!((tally.total_voters, tally.votes_cast), (4, 3));
        assert!(!tally.is_approved());
        assert!(matches!(
            facade.approve_variant(&handle, &proposal.id, "variant-1", false),
            Err(FacadeError::ConsentNotReached(ConsentStatus::Pending))
        ));
    }

    #[test]
    fn test_votes_of_removed_respondent_stop_counting() {
        let (facade, handle, proposal) = setup(&["a", "b", "c"]);
        for r in ["a", "b", "c"] {
            facade
                .cast_vote(&handle, &proposal.id, "variant-2", r, VoteValue::Agree, None)
                .unwrap();
        }
        let gone = facade
            .documents(&handle)
            .unwrap()
            .into_iter()
            .find(|d| d.respondent_id == "c")
            .unwrap();
        facade.remove_document(&handle, &gone.id).unwrap();
        facade.add_document(&handle, document(&handle, "e", &[])).unwrap();

        // c's vote is still stored but e has not voted yet
        assert_eq!(facade.get_votes(&handle, &proposal.id, Some("variant-2")).unwrap().len(), 3);
        let tally = facade.consent_tally(&handle, &proposal.id, "variant-2").unwrap();
        assert_eq!((tally.total_voters, tally.votes_cast, tally.agree), (3, 2, 2));
        assert_eq!(tally.status(), ConsentStatus::Pending);

        let results = facade.vote_results(&handle, &proposal.id).unwrap();
        let v2 = results.iter().find(|r| r.variant_id == "variant-2").unwrap();
        assert_eq!(v2.agree, 2);
        assert!(!v2.is_approved);
    }

    #[test]
    fn test_forced_approval() {
        let (facade, handle, proposal) = setup(&["a", "b"]);
        let approved = facade.approve_variant(&handle, &proposal.id, "variant-1", true).unwrap();
        assert_eq!(approved.based_on_variant_id, "variant-1");
    }

    #[test]
    fn test_first_vote_moves_proposal_to_voting() {
        let (facade, handle, proposal) = setup(&["a"]);
        facade
            .cast_vote(&handle, &proposal.id, "variant-1", "a", VoteValue::Abstain, None)
            .unwrap();
        assert_eq!(
            facade.proposal(&handle, &proposal.id).unwrap().status,
            ProposalStatus::Voting
        );
        let state = facade.flow_state(&handle).unwrap();
        assert_eq!(state.sub_step(Topic::VisieHuidige).votes.as_ref().unwrap().len(), 1);
    }
}
