//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory holding one JSON file per collection
    pub data_dir: Option<PathBuf>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir().map(|d| d.join("consent")),
        }
    }
}

impl FileStorageConfig {
    /// Configured directory, or `./.consent` when no platform data dir exists
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".consent"))
    }
}
