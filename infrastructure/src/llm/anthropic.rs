//! Anthropic messages API gateway

use crate::config::FileLlmConfig;
use async_trait::async_trait;
use consent_application::ports::completion_gateway::{CompletionGateway, GatewayError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Concatenated text blocks
    fn text(&self) -> String {
        self.content
            .iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text.as_deref())
            .collect()
    }
}

/// Single-turn completion against an Anthropic-compatible messages endpoint
pub struct AnthropicGateway {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    api_version: String,
}

impl AnthropicGateway {
    /// Build from the `[llm]` section; fails when the API key variable is unset.
    pub fn from_config(config: &FileLlmConfig) -> Result<Self, GatewayError> {
        let api_key = config
            .api_key()
            .ok_or_else(|| GatewayError::MissingApiKey(config.api_key_env.clone()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.timeout_seconds.filter(|s| *s > 0) {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            api_version: config.api_version.clone(),
        })
    }
}

#[async_trait]
impl CompletionGateway for AnthropicGateway {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, GatewayError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("Invalid response body: {}", e)))?;
        let text = parsed.text();
        debug!("Completion of {} chars from {}", text.len(), self.model);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = MessagesRequest {
            model: "m",
            max_tokens: 10,
            messages: [Message {
                role: "user",
                content: "hallo",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 10);
    }

    #[test]
    fn test_response_text_skips_other_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content": [{"type": "text", "text": "{\"a\":"}, {"type": "tool_use", "id": "x"}, {"type": "text", "text": "1}"}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), "{\"a\":1}");
    }

    #[test]
    fn test_missing_key() {
        let config = FileLlmConfig {
            api_key_env: "CONSENT_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..FileLlmConfig::default()
        };
        assert!(matches!(
            AnthropicGateway::from_config(&config),
            Err(GatewayError::MissingApiKey(_))
        ));
    }
}
