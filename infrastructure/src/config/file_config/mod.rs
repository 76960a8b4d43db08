//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; [`FileConfig::workflow_params`] turns them
//! into the application's parameters.

mod llm;
mod logging;
mod storage;
mod voting;

pub use llm::FileLlmConfig;
pub use logging::FileLoggingConfig;
pub use storage::FileStorageConfig;
pub use voting::FileVotingConfig;

use consent_application::WorkflowParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration value that cannot work as given
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("voting.dot_budget cannot be 0")]
    ZeroDotBudget,

    #[error("voting.top_n must be between 1 and 3, got {0}")]
    InvalidTopN(usize),

    #[error("llm.model cannot be empty")]
    EmptyModelName,

    #[error("llm.timeout_seconds cannot be 0")]
    InvalidTimeout,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub storage: FileStorageConfig,
    pub voting: FileVotingConfig,
    pub llm: FileLlmConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if self.voting.dot_budget == 0 {
            issues.push(ConfigValidationError::ZeroDotBudget);
        }
        // goal_1..goal_3 bound the ranking
        if !(1..=3).contains(&self.voting.top_n) {
            issues.push(ConfigValidationError::InvalidTopN(self.voting.top_n));
        }
        if self.llm.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName);
        }
        if self.llm.timeout_seconds == Some(0) {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        issues
    }

    pub fn workflow_params(&self) -> WorkflowParams {
        WorkflowParams::default()
            .with_dot_budget(self.voting.dot_budget.max(1))
            .with_top_n(self.voting.top_n.clamp(1, 3))
            .with_max_tokens(self.llm.max_tokens)
            .with_timeout_seconds(self.llm.timeout_seconds.filter(|s| *s > 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[storage]
data_dir = "/tmp/consent"

[voting]
dot_budget = 5
top_n = 2

[llm]
model = "claude-haiku"
timeout_seconds = 30

[logging]
dir = "/tmp/consent/logs"
audit = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.storage.resolved_data_dir().to_string_lossy(), "/tmp/consent");
        assert_eq!(config.voting.dot_budget, 5);
        assert_eq!(config.llm.model, "claude-haiku");
        assert_eq!(config.llm.api_key_env, "ANTHROPIC_API_KEY");
        assert!(!config.logging.audit);

        let params = config.workflow_params();
        assert_eq!(params.dot_budget, 5);
        assert_eq!(params.top_n, 2);
        assert_eq!(params.timeout, Some(std::time::Duration::from_secs(30)));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[voting]\ntop_n = 1\n").unwrap();
        assert_eq!(config.voting.top_n, 1);
        // Defaults should apply
        assert_eq!(config.voting.dot_budget, 3);
        assert!(config.logging.audit);
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let toml_str = r#"
[voting]
dot_budget = 0
top_n = 7

[llm]
model = " "
timeout_seconds = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.validate(),
            vec![
                ConfigValidationError::ZeroDotBudget,
                ConfigValidationError::InvalidTopN(7),
                ConfigValidationError::EmptyModelName,
                ConfigValidationError::InvalidTimeout,
            ]
        );
        // unusable values are clamped rather than passed on
        let params = config.workflow_params();
        assert_eq!(params.dot_budget, 1);
        assert_eq!(params.top_n, 3);
        assert_eq!(params.timeout, None);
    }
}
