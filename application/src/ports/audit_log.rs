//! Port for the structured audit trail.
//!
//! Defines the [`AuditLog`] trait for recording workflow events (session
//! created, step completed, vote cast, text approved, export generated).
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port keeps a machine-readable
//! record of what the group decided and when (JSONL).

use serde_json::Value;

/// A structured workflow event.
pub struct AuditEvent {
    /// Event type identifier (e.g., "session_created", "vote_cast").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for recording audit events.
///
/// `log` is synchronous and non-fallible; write failures are dropped so the
/// workflow is never interrupted by the audit trail.
pub trait AuditLog: Send + Sync {
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLog;

impl AuditLog for NoAuditLog {
    fn log(&self, _event: AuditEvent) {}
}
