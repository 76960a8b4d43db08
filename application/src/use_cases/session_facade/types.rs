//! Types for the session facade.

use crate::ports::storage::StoreError;
use consent_domain::{
    ApprovedText, ConsentStatus, Document, DomainError, FinalDocument, FlowState, Proposal,
    QuestionType, Session, StoredAnalysis, Vote,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by session-scoped operations
#[derive(Error, Debug)]
pub enum FacadeError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Proposal not found: {0}")]
    ProposalNotFound(String),

    #[error("Variant '{variant}' not found in proposal {proposal}")]
    VariantNotFound { proposal: String, variant: String },

    #[error("No analysis stored for {0}")]
    AnalysisNotFound(QuestionType),

    #[error("Theme not found: {0}")]
    ThemeNotFound(String),

    #[error("Goals have not been clustered yet")]
    NoGoalBoard,

    #[error("Goal cluster not found: {0}")]
    ClusterNotFound(String),

    #[error("Scope items have not been collected yet")]
    NoScopeItems,

    #[error("Scope item not found: {0}")]
    ScopeItemNotFound(String),

    #[error("Unknown respondent: {0}")]
    UnknownRespondent(String),

    #[error("Ballot of {0} is already submitted")]
    BallotSubmitted(String),

    #[error("Consent not reached ({0})")]
    ConsentNotReached(ConsentStatus),

    #[error("Document belongs to session {found}, not {expected}")]
    SessionMismatch { expected: String, found: String },
}

/// A session together with its flow state
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSession {
    pub session: Session,
    pub flow_state: FlowState,
}

/// Every stored entity of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExport {
    pub session: Session,
    pub documents: Vec<Document>,
    pub analyses: Vec<StoredAnalysis>,
    pub proposals: Vec<Proposal>,
    pub votes: Vec<Vote>,
    pub approved_texts: Vec<ApprovedText>,
    pub final_document: Option<FinalDocument>,
    pub flow_state: FlowState,
}

/// A facilitator action on the goal ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankAction {
    Add(String),
    Remove(String),
    MoveUp(String),
    MoveDown(String),
    /// Drop the first cluster onto the position of the second
    MoveOnto { cluster: String, target: String },
}
