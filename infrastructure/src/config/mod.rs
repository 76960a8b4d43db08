//! Configuration file loading for consent
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CONSENT_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./consent.toml` or `./.consent.toml`
//! 4. Global: `$XDG_CONFIG_HOME/consent/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLlmConfig, FileLoggingConfig, FileStorageConfig,
    FileVotingConfig,
};
pub use loader::ConfigLoader;
