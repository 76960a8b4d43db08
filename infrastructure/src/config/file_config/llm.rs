//! Completion service configuration from TOML (`[llm]` section)

use serde::{Deserialize, Serialize};

/// Anthropic-messages compatible completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// Messages endpoint URL.
    pub endpoint: String,
    /// Model name sent with every request.
    pub model: String,
    /// Response size limit.
    pub max_tokens: u32,
    /// Environment variable holding the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// API version header.
    pub api_version: String,
    /// Request timeout; unset waits indefinitely.
    pub timeout_seconds: Option<u64>,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_version: "2023-06-01".to_string(),
            timeout_seconds: Some(120),
        }
    }
}

impl FileLlmConfig {
    /// The API key from the configured environment variable, if set and non-empty
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}
