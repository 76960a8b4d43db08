//! Vote types for consent decisions

use crate::core::error::DomainError;
use crate::core::ids::{new_id, now};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a respondent said about a proposal variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    Agree,
    Disagree,
    Abstain,
}

impl VoteValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Agree => "agree",
            VoteValue::Disagree => "disagree",
            VoteValue::Abstain => "abstain",
        }
    }
}

impl std::fmt::Display for VoteValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoteValue {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "agree" | "yes" | "eens" => Ok(VoteValue::Agree),
            "disagree" | "no" | "oneens" => Ok(VoteValue::Disagree),
            "abstain" | "onthouding" => Ok(VoteValue::Abstain),
            _ => Err(DomainError::UnknownVoteValue(s.to_string())),
        }
    }
}

/// Identity of a vote: one per respondent per proposal variant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoteKey {
    pub proposal_id: String,
    pub variant_id: String,
    pub respondent_id: String,
}

/// A single respondent's vote on a proposal variant (Entity)
///
/// # Example
///
/// ```
/// use consent_domain::consensus::{Vote, VoteValue};
///
/// let vote = Vote::new("s1", "p1", "variant-2", "roel", VoteValue::Agree, None).unwrap();
/// assert_eq!(vote.value, VoteValue::Agree);
///
/// // An objection must say why
/// assert!(Vote::new("s1", "p1", "variant-2", "roel", VoteValue::Disagree, None).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: String,
    pub session_id: String,
    pub proposal_id: String,
    pub variant_id: String,
    pub respondent_id: String,
    pub value: VoteValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub voted_at: DateTime<Utc>,
}

impl Vote {
    /// Create a vote, rejecting a disagree vote without a comment
    pub fn new(
        session_id: impl Into<String>,
        proposal_id: impl Into<String>,
        variant_id: impl Into<String>,
        respondent_id: impl Into<String>,
        value: VoteValue,
        comment: Option<String>,
    ) -> Result<Self, DomainError> {
        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        if value == VoteValue::Disagree && comment.is_none() {
            return Err(DomainError::MissingObjectionComment);
        }

        Ok(Self {
            id: new_id(),
            session_id: session_id.into(),
            proposal_id: proposal_id.into(),
            variant_id: variant_id.into(),
            respondent_id: respondent_id.into(),
            value,
            comment,
            voted_at: now(),
        })
    }

    pub fn key(&self) -> VoteKey {
        VoteKey {
            proposal_id: self.proposal_id.clone(),
            variant_id: self.variant_id.clone(),
            respondent_id: self.respondent_id.clone(),
        }
    }

    pub fn is_objection(&self) -> bool {
        self.value == VoteValue::Disagree
    }
}
