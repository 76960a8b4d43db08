//! Completion gateways
//!
//! | Gateway | Feature | Backend |
//! |---------|---------|---------|
//! | [`AnthropicGateway`] | `llm` | Anthropic messages API over `reqwest` |
//!
//! Without the `llm` feature the binary wires
//! [`UnavailableGateway`](consent_application::UnavailableGateway), and every
//! collaborator call takes its typed fallback.

#[cfg(feature = "llm")]
mod anthropic;

#[cfg(feature = "llm")]
pub use anthropic::AnthropicGateway;
