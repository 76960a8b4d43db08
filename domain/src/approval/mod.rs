//! Approved texts and the final document projected from them

pub mod final_document;

pub use final_document::{FinalDocument, GoalEntry, ScopeSection, VisionSection};

use crate::core::ids::{new_id, now};
use crate::core::question::QuestionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Proposal reference used for goal texts derived from a ranked cluster
pub const CLUSTER_SOURCE: &str = "cluster";
/// Proposal reference used for the approved scope text
pub const SCOPE_SOURCE: &str = "scope";
pub const SCOPE_FINAL_VARIANT: &str = "scope-final";

/// The accepted wording for one question type.
///
/// At most one exists per (session, question type); a new approval replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedText {
    pub id: String,
    pub session_id: String,
    pub question_type: QuestionType,
    pub text: String,
    pub approved_at: DateTime<Utc>,
    pub based_on_proposal_id: String,
    pub based_on_variant_id: String,
}

impl ApprovedText {
    pub fn new(
        session_id: impl Into<String>,
        question_type: QuestionType,
        text: impl Into<String>,
        proposal_id: impl Into<String>,
        variant_id: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            session_id: session_id.into(),
            question_type,
            text: text.into(),
            approved_at: now(),
            based_on_proposal_id: proposal_id.into(),
            based_on_variant_id: variant_id.into(),
        }
    }

    pub fn is_from_cluster(&self) -> bool {
        self.based_on_proposal_id == CLUSTER_SOURCE
    }
}
