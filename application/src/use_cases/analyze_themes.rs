//! Analyze themes use case
//!
//! Sends the answers of one question to the completion collaborator and
//! stores the parsed [`Analysis`]. Goal clustering is the same analysis run
//! over `goal_1..goal_3` together; its themes become the clusters of a fresh
//! goal board.
//!
//! ```text
//! answers ──▶ prompt ──▶ collaborator ──▶ parse_analysis ──▶ StoredAnalysis
//!                            │ (error / timeout / garbage)
//!                            └──────────▶ empty analysis
//! ```

use crate::ports::completion_gateway::CompletionGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::session_facade::{FacadeError, SessionFacade};
use crate::use_cases::shared::request_completion;
use consent_domain::document::answers_for;
use consent_domain::goals::{clusters_from_analysis, collect_goal_statements};
use consent_domain::{
    Analysis, GoalBoard, PromptTemplate, QuestionType, SessionHandle, StoredAnalysis,
    parse_analysis,
};
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("No answers to analyze for {0}")]
    NoAnswers(QuestionType),

    #[error(transparent)]
    Facade(#[from] FacadeError),
}

pub struct AnalyzeThemesUseCase {
    gateway: Arc<dyn CompletionGateway>,
    facade: SessionFacade,
}

impl AnalyzeThemesUseCase {
    pub fn new(gateway: Arc<dyn CompletionGateway>, facade: SessionFacade) -> Self {
        Self { gateway, facade }
    }

    pub async fn execute(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
    ) -> Result<StoredAnalysis, AnalyzeError> {
        self.execute_with_progress(handle, question, &NoProgress).await
    }

    /// Analyze one question and store the result, replacing any earlier analysis.
    ///
    /// # Errors
    ///
    /// - [`AnalyzeError::NoAnswers`] - no respondent answered the question
    /// - [`AnalyzeError::Facade`] - the session or store failed
    pub async fn execute_with_progress(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
        progress: &dyn ProgressNotifier,
    ) -> Result<StoredAnalysis, AnalyzeError> {
        let documents = self.facade.documents(handle)?;
        let answers = answers_for(&documents, question);
        if answers.is_empty() {
            return Err(AnalyzeError::NoAnswers(question));
        }

        let prompt = PromptTemplate::analyze_themes(question, &answers);
        let analysis = self.analyze(&prompt, question, progress).await;
        info!("Analysis of {}: {} themes", question, analysis.themes.len());
        Ok(self.facade.save_analysis(handle, question, analysis)?)
    }

    /// Analyze several questions concurrently. Questions without answers are skipped.
    pub async fn execute_many(
        &self,
        handle: &SessionHandle,
        questions: &[QuestionType],
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<StoredAnalysis>, AnalyzeError> {
        let documents = self.facade.documents(handle)?;
        let prompts: Vec<(QuestionType, String)> = questions
            .iter()
            .filter_map(|q| {
                let answers = answers_for(&documents, *q);
                (!answers.is_empty()).then(|| (*q, PromptTemplate::analyze_themes(*q, &answers)))
            })
            .collect();

        let analyses = join_all(
            prompts
                .iter()
                .map(|(q, prompt)| self.analyze(prompt, *q, progress)),
        )
        .await;

        // Stored one by one: every save rewrites the same flow-state record
        let mut stored = Vec::with_capacity(analyses.len());
        for ((question, _), analysis) in prompts.iter().zip(analyses) {
            stored.push(self.facade.save_analysis(handle, *question, analysis)?);
        }
        Ok(stored)
    }

    /// Cluster every respondent's goals and start a fresh goal board.
    ///
    /// The analysis is stored under `goal_1`. Each cluster takes the
    /// highest-priority goal of every respondent the theme mentions.
    pub async fn cluster_goals(
        &self,
        handle: &SessionHandle,
        progress: &dyn ProgressNotifier,
    ) -> Result<GoalBoard, AnalyzeError> {
        let documents = self.facade.documents(handle)?;
        let statements = collect_goal_statements(&documents);
        if statements.is_empty() {
            return Err(AnalyzeError::NoAnswers(QuestionType::Goal1));
        }

        let answers: Vec<(&str, &str)> = statements
            .iter()
            .map(|s| (s.respondent_id.as_str(), s.text.as_str()))
            .collect();
        let prompt = PromptTemplate::analyze_themes(QuestionType::Goal1, &answers);

        let analysis = self.analyze(&prompt, QuestionType::Goal1, progress).await;
        let clusters = clusters_from_analysis(&analysis, &statements);
        self.facade.save_analysis(handle, QuestionType::Goal1, analysis)?;
        if clusters.is_empty() {
            warn!("Goal clustering produced no clusters");
        }
        Ok(self.facade.init_goal_board(handle, clusters)?)
    }

    async fn analyze(&self, prompt: &str, question: QuestionType, progress: &dyn ProgressNotifier) -> Analysis {
        let label = format!("analyse {}", question);
        progress.on_task_start(&label);
        let analysis = request_completion(self.gateway.as_ref(), prompt, self.facade.params(), &label)
            .await
            .map(|text| parse_analysis(&text, question))
            .unwrap_or_default();
        if analysis.is_empty() {
            warn!("{}: no usable themes in response", label);
        }
        progress.on_task_complete(&label, analysis.is_empty());
        analysis
    }
}
