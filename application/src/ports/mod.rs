//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod audit_log;
pub mod completion_gateway;
pub mod document_extractor;
pub mod exporter;
pub mod progress;
pub mod storage;
