//! Presentation layer for consent
//!
//! This crate contains CLI definitions, console formatting of matrices,
//! tallies and flow progress, and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{
    Cli, Command, DocCommand, GoalsCommand, RankCommand, ScopeCommand, SessionCommand, StepCommand,
};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
