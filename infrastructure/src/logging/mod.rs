//! Logging infrastructure: the structured audit trail.
//!
//! Provides [`JsonlAuditLogger`], a JSONL file writer that implements the
//! [`AuditLog`](consent_application::AuditLog) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlAuditLogger;
