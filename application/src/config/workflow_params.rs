//! Workflow parameters: voting and collaborator limits.
//!
//! [`WorkflowParams`] groups the static parameters the use cases need:
//! dot-voting budget, ranking size, and how long to wait for the completion
//! collaborator before taking the fallback.

use consent_domain::consensus::dot_voting::DEFAULT_DOT_BUDGET;
use consent_domain::consensus::ranking::DEFAULT_TOP_N;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// # Usage
///
/// | Field | Used by |
/// |-------|---------|
/// | `dot_budget` | goal dot voting |
/// | `top_n` | goal ranking |
/// | `max_tokens` | analysis, proposals, field extraction |
/// | `timeout` | analysis, proposals, field extraction |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowParams {
    /// Points each voter may allocate in dot voting.
    pub dot_budget: u32,
    /// Number of ranked goals carried into `goal_1..goal_N`.
    pub top_n: usize,
    /// Response size limit for completion requests.
    pub max_tokens: u32,
    /// Timeout per completion request; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for WorkflowParams {
    fn default() -> Self {
        Self {
            dot_budget: DEFAULT_DOT_BUDGET,
            top_n: DEFAULT_TOP_N,
            max_tokens: 4096,
            timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl WorkflowParams {
    pub fn with_dot_budget(mut self, budget: u32) -> Self {
        self.dot_budget = budget;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// `None` disables the timeout.
    pub fn with_timeout_seconds(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds.map(Duration::from_secs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = WorkflowParams::default();
        assert_eq!(params.dot_budget, 3);
        assert_eq!(params.top_n, 3);
        assert_eq!(params.timeout, Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_builder() {
        let params = WorkflowParams::default()
            .with_dot_budget(5)
            .with_top_n(2)
            .with_max_tokens(1024)
            .with_timeout_seconds(None);
        assert_eq!(params.dot_budget, 5);
        assert_eq!(params.top_n, 2);
        assert_eq!(params.max_tokens, 1024);
        assert!(params.timeout.is_none());
    }
}
