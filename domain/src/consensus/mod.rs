//! Consensus and voting engine
//!
//! Pure decision algorithms that turn raw group input into results.
//! None of them mutate stored state.
//!
//! | Algorithm | Input | Output |
//! |-----------|-------|--------|
//! | [`matrix`] | free-text answers per respondent | consensus / unique / neutral per cell |
//! | [`dot_voting`] | point allocations per voter | ranked cluster totals |
//! | [`ranking`] | facilitator add / remove / reorder | ordered top-N list |
//! | [`consent`] | agree / disagree / abstain votes | consent verdict |
//!
//! # Consent vs. majority
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  approved ⇔ votes_cast > 0                               │
//! │           ∧ no disagree vote                             │
//! │           ∧ every expected voter has voted               │
//! │                                                          │
//! │  one objection blocks, however many agree votes exist    │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod consent;
pub mod dot_voting;
pub mod matrix;
pub mod ranking;
pub mod vote;

pub use consent::{ConsentStatus, ConsentTally, VoteResults};
pub use dot_voting::{ClusterPoints, DotBallot, tally_dot_votes};
pub use matrix::{CellConsensus, ConsensusMatrix, MatrixRow, consensus_cells, keywords};
pub use ranking::Ranking;
pub use vote::{Vote, VoteKey, VoteValue};
