//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for the daily-rolling log file; unset logs to stderr only
    pub dir: Option<PathBuf>,
    /// Write the JSONL audit trail next to the data files
    pub audit: bool,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            audit: true,
        }
    }
}
