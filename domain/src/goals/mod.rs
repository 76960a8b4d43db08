//! Goal clustering, dot voting and top-N ranking for the doelen topic
//!
//! ```text
//! documents ──collect──▶ GoalStatement (respondent, rank 1..3)
//!                              │
//! analysis themes ──────▶ GoalCluster ──dot votes──▶ totals
//!                              │
//!                  facilitator ranking (top N)
//!                              │
//!                              ▼
//!                  goal_1 .. goal_N approved texts
//! ```

use crate::analysis::Analysis;
use crate::consensus::{DotBallot, Ranking, tally_dot_votes};
use crate::core::error::DomainError;
use crate::core::question::QuestionType;
use crate::document::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One respondent's goal with its original priority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalStatement {
    pub id: String,
    pub respondent_id: String,
    pub text: String,
    /// 1 is the respondent's highest priority
    pub rank: u8,
}

/// Non-empty goal answers of every document, in document then rank order
pub fn collect_goal_statements(documents: &[Document]) -> Vec<GoalStatement> {
    documents
        .iter()
        .flat_map(|doc| {
            QuestionType::GOALS.iter().filter_map(move |q| {
                let text = doc.answer(*q).trim();
                let rank = q.goal_rank()?;
                (!text.is_empty()).then(|| GoalStatement {
                    id: format!("{}-goal-{}", doc.id, rank),
                    respondent_id: doc.respondent_id.clone(),
                    text: text.to_string(),
                    rank,
                })
            })
        })
        .collect()
}

/// A group of similar goals (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCluster {
    pub id: String,
    pub name: String,
    pub description: String,
    pub goals: Vec<GoalStatement>,
    #[serde(default)]
    pub votes: u32,
}

impl GoalCluster {
    /// Mean of the original priorities, `None` for an empty cluster
    pub fn average_priority(&self) -> Option<f64> {
        if self.goals.is_empty() {
            return None;
        }
        let sum: u32 = self.goals.iter().map(|g| u32::from(g.rank)).sum();
        Some(f64::from(sum) / self.goals.len() as f64)
    }

    /// Default wording for the approved goal text
    pub fn formulation(&self) -> String {
        if self.description.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{}: {}", self.name, self.description)
        }
    }
}

/// Turn analysis themes into goal clusters.
///
/// Each respondent named by a theme contributes their highest-priority goal
/// statement. Themes without an id get `cluster-<index>`.
pub fn clusters_from_analysis(analysis: &Analysis, statements: &[GoalStatement]) -> Vec<GoalCluster> {
    analysis
        .themes
        .iter()
        .enumerate()
        .map(|(index, theme)| {
            let mut respondents: Vec<&str> = Vec::new();
            for id in theme.mentioned_by.iter().chain(&theme.related_responses) {
                if !respondents.contains(&id.as_str()) {
                    respondents.push(id);
                }
            }
            let goals = respondents
                .iter()
                .filter_map(|r| {
                    statements
                        .iter()
                        .filter(|s| s.respondent_id == *r)
                        .min_by_key(|s| s.rank)
                        .cloned()
                })
                .collect();
            GoalCluster {
                id: if theme.id.is_empty() {
                    format!("cluster-{}", index)
                } else {
                    theme.id.clone()
                },
                name: theme.name.clone(),
                description: theme.description.clone(),
                goals,
                votes: 0,
            }
        })
        .collect()
}

/// Working state of the doelen topic (Aggregate)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalBoard {
    pub clusters: Vec<GoalCluster>,
    #[serde(default)]
    pub ballots: Vec<DotBallot>,
    pub ranking: Ranking,
    /// Facilitator-edited wording per cluster id
    #[serde(default)]
    pub formulations: BTreeMap<String, String>,
}

impl GoalBoard {
    pub fn new(clusters: Vec<GoalCluster>, top_n: usize) -> Self {
        Self {
            clusters,
            ballots: Vec::new(),
            ranking: Ranking::new(top_n),
            formulations: BTreeMap::new(),
        }
    }

    pub fn cluster(&self, cluster_id: &str) -> Option<&GoalCluster> {
        self.clusters.iter().find(|c| c.id == cluster_id)
    }

    pub fn rename_cluster(&mut self, cluster_id: &str, name: impl Into<String>) -> bool {
        match self.clusters.iter_mut().find(|c| c.id == cluster_id) {
            Some(cluster) => {
                cluster.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Keep only the given clusters for voting. An empty selection keeps all.
    pub fn select_for_voting(&mut self, cluster_ids: &[String]) {
        if cluster_ids.is_empty() {
            return;
        }
        self.clusters.retain(|c| cluster_ids.contains(&c.id));
    }

    /// The voter's ballot, created with `budget` points on first use
    pub fn ballot_mut(&mut self, voter: &str, budget: u32) -> &mut DotBallot {
        let index = match self.ballots.iter().position(|b| b.voter == voter) {
            Some(index) => index,
            None => {
                self.ballots.push(DotBallot::new(voter, budget));
                self.ballots.len() - 1
            }
        };
        &mut self.ballots[index]
    }

    /// Copy submitted dot-vote totals onto the clusters
    pub fn apply_tally(&mut self) {
        let ids: Vec<String> = self.clusters.iter().map(|c| c.id.clone()).collect();
        let totals = tally_dot_votes(&ids, &self.ballots);
        for cluster in &mut self.clusters {
            cluster.votes = totals
                .iter()
                .find(|t| t.cluster_id == cluster.id)
                .map(|t| t.points)
                .unwrap_or(0);
        }
    }

    /// Clusters by votes descending, then by average priority ascending
    pub fn sorted_clusters(&self) -> Vec<&GoalCluster> {
        let mut sorted: Vec<&GoalCluster> = self.clusters.iter().collect();
        sorted.sort_by(|a, b| {
            b.votes.cmp(&a.votes).then_with(|| {
                let pa = a.average_priority().unwrap_or(f64::MAX);
                let pb = b.average_priority().unwrap_or(f64::MAX);
                pa.total_cmp(&pb)
            })
        });
        sorted
    }

    pub fn set_formulation(&mut self, cluster_id: &str, text: impl Into<String>) {
        self.formulations.insert(cluster_id.to_string(), text.into());
    }

    pub fn formulation(&self, cluster_id: &str) -> Option<String> {
        if let Some(text) = self.formulations.get(cluster_id) {
            return Some(text.clone());
        }
        self.cluster(cluster_id).map(GoalCluster::formulation)
    }

    /// `(goal_k, cluster id, text)` for every ranked cluster.
    ///
    /// A partial ranking yields fewer goals; an empty one is rejected.
    pub fn goal_texts(&self) -> Result<Vec<(QuestionType, String, String)>, DomainError> {
        if self.ranking.is_empty() {
            return Err(DomainError::EmptyRanking);
        }
        self.ranking
            .ranked()
            .map(|(rank, cluster_id)| {
                let question = QuestionType::goal_for_rank(rank).ok_or_else(|| {
                    DomainError::InvalidInput(format!("No goal question for rank {}", rank))
                })?;
                let text = self.formulation(cluster_id).ok_or_else(|| {
                    DomainError::InvalidInput(format!("Unknown goal cluster: {}", cluster_id))
                })?;
                Ok((question, cluster_id.to_string(), text))
            })
            .collect()
    }
}
