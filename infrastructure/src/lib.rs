//! Infrastructure layer for consent
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, plus configuration file loading.

pub mod config;
pub mod export;
pub mod import;
pub mod llm;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLlmConfig, FileLoggingConfig,
    FileStorageConfig, FileVotingConfig,
};
pub use export::{JsonExporter, MarkdownExporter, default_exporters};
pub use import::PlainTextExtractor;
#[cfg(feature = "llm")]
pub use llm::AnthropicGateway;
pub use logging::JsonlAuditLogger;
pub use storage::JsonFileMedium;
