//! Core domain concepts shared across all subdomains.
//!
//! - [`question::QuestionType`] : the eight fixed canvas questions
//! - [`error::DomainError`] : domain-level errors
//! - [`ids`] : identifier and clock helpers

pub mod error;
pub mod ids;
pub mod question;
