//! Facilitation sessions

use crate::core::ids::{new_id, now};
use crate::workflow::{FlowState, FlowStep};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One facilitation engagement, from upload to export (Entity)
///
/// Owns every other entity through their `session_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub current_step: FlowStep,
}

impl Session {
    pub fn new(name: impl Into<String>) -> Self {
        let created = now();
        Self {
            id: new_id(),
            name: name.into(),
            created_at: created,
            updated_at: created,
            status: SessionStatus::InProgress,
            current_step: FlowStep::Upload,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(self.id.clone())
    }

    pub fn touch(&mut self) {
        self.updated_at = now();
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Mirror the flow state: current step, and completion once every topic is approved
    pub fn sync_with(&mut self, state: &FlowState) {
        self.current_step = state.current_step;
        if state.is_session_complete() {
            self.status = SessionStatus::Completed;
        }
        self.touch();
    }
}

/// Reference to an open session, passed into every workflow operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHandle(String);

impl SessionHandle {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self(session_id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted flow state of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowStateRecord {
    pub session_id: String,
    pub state: FlowState,
}
