//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod analyze_themes;
pub mod export_final_document;
pub mod generate_proposals;
pub mod import_document;
pub mod session_facade;
pub(crate) mod shared;
