//! Text-completion gateway port
//!
//! The analysis, proposal and field-extraction collaborators are all a single
//! prompt in, text out call. Parsing of the text happens in the domain.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during completion requests
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Missing API key: set {0}")]
    MissingApiKey(String),

    #[error("Timeout")]
    Timeout,

    #[error("No completion service configured")]
    Unavailable,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for text completion
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send one prompt and return the full response text
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, GatewayError>;
}

/// Gateway used when no service is configured.
///
/// Every call fails with [`GatewayError::Unavailable`], so callers take their
/// typed fallback.
pub struct UnavailableGateway;

#[async_trait]
impl CompletionGateway for UnavailableGateway {
    async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, GatewayError> {
        Err(GatewayError::Unavailable)
    }
}
