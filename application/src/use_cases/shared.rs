//! Shared helpers for the collaborator-backed use cases.
//!
//! A failed, timed-out or unavailable collaborator never fails the use case:
//! the caller receives `None` and takes its typed fallback.

use crate::config::WorkflowParams;
use crate::ports::completion_gateway::{CompletionGateway, GatewayError};
use tracing::{debug, warn};

/// Send one prompt, honouring the configured timeout.
pub(crate) async fn request_completion(
    gateway: &dyn CompletionGateway,
    prompt: &str,
    params: &WorkflowParams,
    label: &str,
) -> Option<String> {
    let request = gateway.complete(prompt, params.max_tokens);
    let result = match params.timeout {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .unwrap_or(Err(GatewayError::Timeout)),
        None => request.await,
    };

    match result {
        Ok(text) => {
            debug!("{}: received {} bytes", label, text.len());
            Some(text)
        }
        Err(e) => {
            warn!("{}: collaborator failed, using fallback: {}", label, e);
            None
        }
    }
}
