//! Consent-based approval

use super::vote::{Vote, VoteValue};
use serde::{Deserialize, Serialize};

/// Banner state derived from a tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentStatus {
    /// Everyone voted, nobody objected
    Approved,
    /// At least one disagree vote
    Objections,
    /// Everyone voted but the verdict is not approval (no votes expected)
    AllVoted,
    /// Waiting for votes
    Pending,
}

impl std::fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsentStatus::Approved => write!(f, "Consent reached"),
            ConsentStatus::Objections => write!(f, "Objections raised"),
            ConsentStatus::AllVoted => write!(f, "All votes in"),
            ConsentStatus::Pending => write!(f, "Waiting for votes"),
        }
    }
}

/// Aggregate of the votes cast on one proposal variant
///
/// # Example
///
/// ```
/// use consent_domain::consensus::ConsentTally;
/// use consent_domain::consensus::VoteValue::*;
///
/// assert!(ConsentTally::from_values(4, &[Agree, Agree, Agree, Agree]).is_approved());
/// assert!(!ConsentTally::from_values(4, &[Agree, Agree, Disagree, Agree]).is_approved());
/// assert!(!ConsentTally::from_values(4, &[Agree, Agree]).is_approved());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentTally {
    pub total_voters: usize,
    pub votes_cast: usize,
    pub agree: usize,
    pub disagree: usize,
    pub abstain: usize,
}

impl ConsentTally {
    pub fn from_values(total_voters: usize, values: &[VoteValue]) -> Self {
        let count = |value: VoteValue| values.iter().filter(|v| **v == value).count();
        Self {
            total_voters,
            votes_cast: values.len(),
            agree: count(VoteValue::Agree),
            disagree: count(VoteValue::Disagree),
            abstain: count(VoteValue::Abstain),
        }
    }

    pub fn from_votes(total_voters: usize, votes: &[Vote]) -> Self {
        let values: Vec<VoteValue> = votes.iter().map(|v| v.value).collect();
        Self::from_values(total_voters, &values)
    }

    /// Expected voters who have not voted yet
    pub fn pending(&self) -> usize {
        self.total_voters.saturating_sub(self.votes_cast)
    }

    /// Approved iff at least one vote, no objection and nobody pending.
    ///
    /// More votes than expected voters is not a complete electorate and
    /// does not approve.
    pub fn is_approved(&self) -> bool {
        self.votes_cast > 0 && self.disagree == 0 && self.votes_cast == self.total_voters
    }

    pub fn has_objections(&self) -> bool {
        self.disagree > 0
    }

    pub fn all_voted(&self) -> bool {
        self.votes_cast >= self.total_voters
    }

    pub fn status(&self) -> ConsentStatus {
        if self.is_approved() {
            ConsentStatus::Approved
        } else if self.has_objections() {
            ConsentStatus::Objections
        } else if self.all_voted() {
            ConsentStatus::AllVoted
        } else {
            ConsentStatus::Pending
        }
    }

    /// Visual summary, one mark per expected voter (e.g. "[●●✕·]")
    pub fn summary(&self) -> String {
        let mut summary = String::from("[");
        summary.extend(std::iter::repeat_n('●', self.agree));
        summary.extend(std::iter::repeat_n('○', self.abstain));
        summary.extend(std::iter::repeat_n('✕', self.disagree));
        summary.extend(std::iter::repeat_n('·', self.pending()));
        summary.push(']');
        summary
    }
}

/// Per-variant results as reported to the group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResults {
    pub proposal_id: String,
    pub variant_id: String,
    pub agree: usize,
    pub disagree: usize,
    pub abstain: usize,
    pub is_approved: bool,
}

impl VoteResults {
    /// Tally the votes that belong to one proposal variant
    pub fn for_variant(
        proposal_id: &str,
        variant_id: &str,
        total_voters: usize,
        votes: &[Vote],
    ) -> Self {
        let relevant: Vec<Vote> = votes
            .iter()
            .filter(|v| v.proposal_id == proposal_id && v.variant_id == variant_id)
            .cloned()
            .collect();
        let tally = ConsentTally::from_votes(total_voters, &relevant);
        Self {
            proposal_id: proposal_id.to_string(),
            variant_id: variant_id.to_string(),
            agree: tally.agree,
            disagree: tally.disagree,
            abstain: tally.abstain,
            is_approved: tally.is_approved(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::VoteValue::*;
    use super::*;

    #[test]
    fn test_unanimous_agree_approves() {
        let tally = ConsentTally::from_values(4, &[Agree, Agree, Agree, Agree]);
        assert!(tally.is_approved());
        assert_eq!(tally.status(), ConsentStatus::Approved);
        assert_eq!(tally.pending(), 0);
    }

    #[test]
    fn test_single_objection_blocks() {
        let tally = ConsentTally::from_values(4, &[Agree, Agree, Disagree, Agree]);
        assert!(!tally.is_approved());
        assert_eq!(tally.disagree, 1);
        assert_eq!(tally.status(), ConsentStatus::Objections);
    }

    #[test]
    fn test_pending_blocks() {
        let tally = ConsentTally::from_values(4, &[Agree, Agree]);
        assert!(!tally.is_approved());
        assert_eq!(tally.pending(), 2);
        assert_eq!(tally.status(), ConsentStatus::Pending);
    }

    #[test]
    fn test_abstentions_do_not_block() {
        let tally = ConsentTally::from_values(3, &[Agree, Abstain, Abstain]);
        assert!(tally.is_approved());
    }

    #[test]
    fn test_no_votes_never_approves() {
        let tally = ConsentTally::from_values(0, &[]);
        assert!(!tally.is_approved());
        assert_eq!(tally.status(), ConsentStatus::AllVoted);
    }

    #[test]
    fn test_more_votes_than_voters_is_not_approval() {
        let tally = ConsentTally::from_values(2, &[Agree, Agree, Agree]);
        assert!(!tally.is_approved());
        assert_eq!(tally.pending(), 0);
    }

    #[test]
    fn test_summary() {
        let tally = ConsentTally::from_values(5, &[Agree, Abstain, Disagree]);
        assert_eq!(tally.summary(), "[●○✕··]");
    }

    #[test]
    fn test_vote_results_filters_by_variant() {
        let votes = vec![
            Vote::new("s", "p1", "v1", "a", Agree, None).unwrap(),
            Vote::new("s", "p1", "v1", "b", Agree, None).unwrap(),
            Vote::new("s", "p1", "v2", "a", Disagree, Some("no".into())).unwrap(),
            Vote::new("s", "p2", "v1", "c", Disagree, Some("no".into())).unwrap(),
        ];
        let results = VoteResults::for_variant("p1", "v1", 2, &votes);
        assert_eq!(results.agree, 2);
        assert_eq!(results.disagree, 0);
        assert!(results.is_approved);

        let other = VoteResults::for_variant("p1", "v2", 2, &votes);
        assert_eq!(other.disagree, 1);
        assert!(!other.is_approved);
    }
}
