//! Domain error types

use crate::workflow::FlowStep;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("A disagree vote requires a comment explaining the objection")]
    MissingObjectionComment,

    #[error("Cannot proceed to step '{target}': earlier steps are not completed")]
    StepNotReachable { target: FlowStep },

    #[error("Step '{0}' is locked")]
    StepLocked(FlowStep),

    #[error("Already at the last step")]
    NoNextStep,

    #[error("Unknown question type: {0}")]
    UnknownQuestionType(String),

    #[error("Unknown flow step: {0}")]
    UnknownFlowStep(String),

    #[error("Unknown vote value: {0}")]
    UnknownVoteValue(String),

    #[error("Goal ranking is empty")]
    EmptyRanking,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DomainError {
    /// Whether this error is a rejected navigation attempt
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            DomainError::StepNotReachable { .. } | DomainError::StepLocked(_) | DomainError::NoNextStep
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_comment_display() {
        assert_eq!(
            DomainError::MissingObjectionComment.to_string(),
            "A disagree vote requires a comment explaining the objection"
        );
    }

    #[test]
    fn test_is_navigation() {
        assert!(
            DomainError::StepNotReachable {
                target: FlowStep::Doelen
            }
            .is_navigation()
        );
        assert!(DomainError::NoNextStep.is_navigation());
        assert!(!DomainError::EmptyRanking.is_navigation());
    }
}
