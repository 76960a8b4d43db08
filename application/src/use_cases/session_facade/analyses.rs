//! Stored theme analyses and facilitator theme edits.

use super::{FacadeError, SessionFacade};
use consent_domain::{Analysis, QuestionType, SessionHandle, StoredAnalysis, Topic};
use tracing::debug;

/// A facilitator edit to one theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeEdit {
    Rename(String),
    Describe(String),
    Delete,
}

impl SessionFacade {
    /// Store the analysis for a question, replacing any earlier one, and
    /// cache its themes on the topic.
    pub fn save_analysis(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
        analysis: Analysis,
    ) -> Result<StoredAnalysis, FacadeError> {
        let stored = StoredAnalysis::new(handle.id(), question, analysis);
        self.store.upsert(&stored)?;
        let themes = stored.analysis.themes.clone();
        self.update_flow_state(handle, |state| {
            state.sub_step_mut(Topic::for_question(question)).set_themes(themes);
            Ok(())
        })?;
        debug!(
            "Stored analysis for {} with {} themes",
            question,
            stored.analysis.themes.len()
        );
        Ok(stored)
    }

    pub fn analysis(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
    ) -> Result<Option<StoredAnalysis>, FacadeError> {
        Ok(self.store.get(&format!("{}/{}", handle.id(), question))?)
    }

    pub fn analyses(&self, handle: &SessionHandle) -> Result<Vec<StoredAnalysis>, FacadeError> {
        Ok(self.store.list(handle.id())?)
    }

    /// Rename, describe or delete a theme in a stored analysis
    pub fn edit_theme(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
        theme_id: &str,
        edit: ThemeEdit,
    ) -> Result<StoredAnalysis, FacadeError> {
        let mut stored = self
            .analysis(handle, question)?
            .ok_or(FacadeError::AnalysisNotFound(question))?;
        let found = match edit {
            ThemeEdit::Rename(name) => stored.rename_theme(theme_id, name),
            ThemeEdit::Describe(description) => stored.describe_theme(theme_id, description),
            ThemeEdit::Delete => stored.delete_theme(theme_id),
        };
        if !found {
            return Err(FacadeError::ThemeNotFound(theme_id.to_string()));
        }
        self.store.upsert(&stored)?;
        let themes = stored.analysis.themes.clone();
        self.update_flow_state(handle, |state| {
            state.sub_step_mut(Topic::for_question(question)).themes = Some(themes);
            Ok(())
        })?;
        Ok(stored)
    }
}
