//! Domain layer for consent
//!
//! Pure types and algorithms of a staged consensus-building workflow. No I/O:
//! persistence, text completion and document formats live behind ports in
//! the application layer.
//!
//! # Core Concepts
//!
//! ## Flow
//!
//! A session walks eight ordered steps. Forward navigation is gated on the
//! completion of every earlier step; backward navigation is always allowed.
//!
//! ```text
//! upload → visie_huidige → visie_gewenste → visie_beweging
//!        → visie_stakeholders → doelen → scope → export
//! ```
//!
//! ## Consent
//!
//! A wording is approved only when every expected voter has voted and no one
//! objected. One objection blocks, regardless of the number of agree votes.
//!
//! ## Approved texts
//!
//! Exactly one accepted wording per (session, question type). The final
//! document is a projection of these texts at export time.

pub mod analysis;
pub mod approval;
pub mod consensus;
pub mod core;
pub mod document;
pub mod goals;
pub mod parsing;
pub mod prompt;
pub mod proposal;
pub mod scope;
pub mod session;
pub mod store;
pub mod util;
pub mod workflow;

// Re-export commonly used types
pub use analysis::{Analysis, ConsensusLevel, StoredAnalysis, Tension, ThemeCluster};
pub use approval::{ApprovedText, FinalDocument, GoalEntry, ScopeSection, VisionSection};
pub use consensus::{
    CellConsensus, ClusterPoints, ConsensusMatrix, ConsentStatus, ConsentTally, DotBallot,
    MatrixRow, Ranking, Vote, VoteKey, VoteResults, VoteValue, consensus_cells, tally_dot_votes,
};
pub use core::{
    error::DomainError,
    question::{QuestionCategory, QuestionType},
};
pub use document::{CanvasResponses, Document};
pub use goals::{GoalBoard, GoalCluster, GoalStatement};
pub use parsing::{CanvasExtraction, parse_analysis, parse_canvas_fields, parse_proposal_set};
pub use prompt::PromptTemplate;
pub use proposal::{Proposal, ProposalSet, ProposalStatus, ProposalVariant, VariantStyle};
pub use scope::{ScopeCategory, ScopeItem};
pub use session::{FlowStateRecord, Session, SessionHandle, SessionStatus};
pub use store::{Collection, StoredEntity};
pub use workflow::{FLOW_ORDER, FlowState, FlowStep, StepStatus, SubStepState, SubStepStatus, Topic};
