//! Application-level configuration.
//!
//! - [`WorkflowParams`]: voting sizes and collaborator limits

pub mod workflow_params;

pub use workflow_params::WorkflowParams;
