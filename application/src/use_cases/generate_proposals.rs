//! Generate proposals use case
//!
//! Asks the completion collaborator for three wordings (beknopt, volledig,
//! gebalanceerd) of one question, grounded in the stored themes and the raw
//! answers. When the collaborator fails, or its output has no usable variant,
//! the placeholder set is stored instead so voting can still go ahead.

use crate::ports::completion_gateway::CompletionGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::session_facade::{FacadeError, SessionFacade};
use crate::use_cases::shared::request_completion;
use consent_domain::document::answers_for;
use consent_domain::{
    Proposal, ProposalSet, PromptTemplate, QuestionType, SessionHandle, ThemeCluster,
    parse_proposal_set,
};
use std::sync::Arc;
use tracing::{info, warn};

pub struct GenerateProposalsUseCase {
    gateway: Arc<dyn CompletionGateway>,
    facade: SessionFacade,
}

impl GenerateProposalsUseCase {
    pub fn new(gateway: Arc<dyn CompletionGateway>, facade: SessionFacade) -> Self {
        Self { gateway, facade }
    }

    pub async fn execute(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
        theme_id: Option<&str>,
    ) -> Result<Proposal, FacadeError> {
        self.execute_with_progress(handle, question, theme_id, &NoProgress)
            .await
    }

    /// Generate and store a proposal.
    ///
    /// With `theme_id` only that theme of the stored analysis is offered to
    /// the collaborator and the proposal is linked to it; an unknown theme is
    /// [`FacadeError::ThemeNotFound`]. Without an analysis the prompt carries
    /// the answers alone.
    pub async fn execute_with_progress(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
        theme_id: Option<&str>,
        progress: &dyn ProgressNotifier,
    ) -> Result<Proposal, FacadeError> {
        let themes = self.themes(handle, question, theme_id)?;
        let documents = self.facade.documents(handle)?;
        let answers = answers_for(&documents, question);
        let prompt = PromptTemplate::generate_proposals(question, &themes, &answers);

        let label = format!("voorstellen {}", question);
        progress.on_task_start(&label);
        let parsed = request_completion(self.gateway.as_ref(), &prompt, self.facade.params(), &label)
            .await
            .map(|text| parse_proposal_set(&text));
        let fallback = parsed.as_ref().is_none_or(|set| *set == ProposalSet::placeholder());
        if fallback {
            warn!("{}: using placeholder variants", label);
        }
        progress.on_task_complete(&label, fallback);

        let mut proposal = Proposal::new(handle.id(), question, parsed.unwrap_or_else(ProposalSet::placeholder));
        if let Some(id) = theme_id {
            proposal = proposal.with_theme(id);
        }
        let proposal = self.facade.save_proposal(handle, proposal)?;
        info!(
            "Stored proposal {} for {} with {} variants",
            proposal.id,
            question,
            proposal.variants.len()
        );
        Ok(proposal)
    }

    fn themes(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
        theme_id: Option<&str>,
    ) -> Result<Vec<ThemeCluster>, FacadeError> {
        let Some(stored) = self.facade.analysis(handle, question)? else {
            return match theme_id {
                Some(id) => Err(FacadeError::ThemeNotFound(id.to_string())),
                None => Ok(Vec::new()),
            };
        };
        match theme_id {
            Some(id) => stored
                .theme(id)
                .cloned()
                .map(|t| vec![t])
                .ok_or_else(|| FacadeError::ThemeNotFound(id.to_string())),
            None => Ok(stored.analysis.themes),
        }
    }
}
