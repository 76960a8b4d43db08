//! Voting configuration from TOML (`[voting]` section)

use consent_domain::consensus::dot_voting::DEFAULT_DOT_BUDGET;
use consent_domain::consensus::ranking::DEFAULT_TOP_N;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVotingConfig {
    /// Points per voter in goal dot voting
    pub dot_budget: u32,
    /// Number of goals carried into the final document
    pub top_n: usize,
}

impl Default for FileVotingConfig {
    fn default() -> Self {
        Self {
            dot_budget: DEFAULT_DOT_BUDGET,
            top_n: DEFAULT_TOP_N,
        }
    }
}
