//! Dot voting: point allocation with a fixed per-voter budget

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Points each voter gets unless configured otherwise
pub const DEFAULT_DOT_BUDGET: u32 = 3;

/// One voter's point allocation (Value Object)
///
/// The allocated total never exceeds the budget: adding past it is a no-op.
///
/// # Example
///
/// ```
/// use consent_domain::consensus::DotBallot;
///
/// let mut ballot = DotBallot::new("roel", 3);
/// assert!(ballot.add_point("c1"));
/// assert!(ballot.add_point("c1"));
/// assert!(ballot.add_point("c2"));
/// assert!(!ballot.add_point("c3")); // budget spent
/// assert_eq!(ballot.used(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DotBallot {
    pub voter: String,
    pub budget: u32,
    allocations: BTreeMap<String, u32>,
    #[serde(default)]
    submitted: bool,
}

impl DotBallot {
    pub fn new(voter: impl Into<String>, budget: u32) -> Self {
        Self {
            voter: voter.into(),
            budget,
            allocations: BTreeMap::new(),
            submitted: false,
        }
    }

    pub fn used(&self) -> u32 {
        self.allocations.values().sum()
    }

    pub fn remaining(&self) -> u32 {
        self.budget.saturating_sub(self.used())
    }

    pub fn points_for(&self, cluster_id: &str) -> u32 {
        self.allocations.get(cluster_id).copied().unwrap_or(0)
    }

    /// Give one point to a cluster. Returns `false` (no-op) when the budget is
    /// spent or the ballot is submitted.
    pub fn add_point(&mut self, cluster_id: &str) -> bool {
        if self.submitted || self.remaining() == 0 {
            return false;
        }
        *self.allocations.entry(cluster_id.to_string()).or_insert(0) += 1;
        true
    }

    /// Take one point back from a cluster. Returns `false` if it had none.
    pub fn remove_point(&mut self, cluster_id: &str) -> bool {
        if self.submitted {
            return false;
        }
        let Some(points) = self.allocations.get_mut(cluster_id) else {
            return false;
        };
        *points -= 1;
        if *points == 0 {
            self.allocations.remove(cluster_id);
        }
        true
    }

    pub fn allocations(&self) -> &BTreeMap<String, u32> {
        &self.allocations
    }

    /// Mark the ballot as handed in; only submitted ballots are tallied and
    /// a submitted ballot is frozen.
    pub fn submit(&mut self) {
        self.submitted = true;
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }
}

/// Total points for one cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterPoints {
    pub cluster_id: String,
    pub points: u32,
}

/// Sum submitted ballots per cluster, ranked by points descending.
///
/// Ties keep the order of `cluster_ids` (stable sort). Points given to ids
/// not in `cluster_ids` are ignored.
pub fn tally_dot_votes(cluster_ids: &[String], ballots: &[DotBallot]) -> Vec<ClusterPoints> {
    let mut totals: Vec<ClusterPoints> = cluster_ids
        .iter()
        .map(|id| ClusterPoints {
            cluster_id: id.clone(),
            points: ballots
                .iter()
                .filter(|b| b.is_submitted())
                .map(|b| b.points_for(id))
                .sum(),
        })
        .collect();
    totals.sort_by(|a, b| b.points.cmp(&a.points));
    totals
}
