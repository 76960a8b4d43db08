//! Session facade
//!
//! Composes the entity store, the flow state machine and the consensus
//! engine behind session-scoped operations. Every operation takes an explicit
//! [`SessionHandle`]; there is no ambient "current session".
//!
//! Every mutating call persists its result before returning. There is no
//! separate save step.
//!
//! | File | Operations |
//! |------|------------|
//! | `mod.rs` | create / load / close / list / resume / rename / delete |
//! | `flow.rs` | set current step, complete, unlock, advance |
//! | `documents.rs` | add, correct, remove documents |
//! | `analyses.rs` | store analyses, edit themes |
//! | `proposals.rs` | store proposals, edit variants, status |
//! | `voting.rs` | cast votes, tallies, consent approval |
//! | `approvals.rs` | approved texts |
//! | `goals.rs` | goal board: dot voting, ranking, approval |
//! | `scope.rs` | scope items and approval |
//! | `export_data.rs` | final document, session bundle |

mod analyses;
mod approvals;
mod documents;
mod export_data;
mod flow;
mod goals;
mod proposals;
mod scope;
mod types;
mod voting;

pub use analyses::ThemeEdit;
pub use types::{FacadeError, LoadedSession, RankAction, SessionExport};

use crate::config::WorkflowParams;
use crate::ports::audit_log::{AuditEvent, AuditLog, NoAuditLog};
use crate::store::EntityStore;
use consent_domain::{
    ApprovedText, FlowState, FlowStateRecord, Session, SessionHandle, SessionStatus,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Session-scoped operations consumed by the presentation layer
#[derive(Clone)]
pub struct SessionFacade {
    pub(super) store: EntityStore,
    pub(super) audit: Arc<dyn AuditLog>,
    pub(super) params: WorkflowParams,
}

impl SessionFacade {
    pub fn new(store: EntityStore, params: WorkflowParams) -> Self {
        Self {
            store,
            audit: Arc::new(NoAuditLog),
            params,
        }
    }

    /// Create with an audit log.
    pub fn with_audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    pub fn params(&self) -> &WorkflowParams {
        &self.params
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    // ==================== Session lifecycle ====================

    /// Create a session with the initial flow state
    pub fn create_session(&self, name: &str) -> Result<LoadedSession, FacadeError> {
        let session = Session::new(name.trim());
        let flow_state = FlowState::initial();
        self.store.create(&session)?;
        self.store.upsert(&FlowStateRecord {
            session_id: session.id.clone(),
            state: flow_state.clone(),
        })?;

        info!("Created session {} ({})", session.name, session.id);
        self.audit.log(AuditEvent::new(
            "session_created",
            json!({ "session_id": session.id, "name": session.name }),
        ));
        Ok(LoadedSession {
            session,
            flow_state,
        })
    }

    /// Hydrate a session and its flow state.
    ///
    /// Cached sub-step statuses are repaired from the approved texts actually
    /// stored, and persisted if that changed anything.
    pub fn load_session(&self, session_id: &str) -> Result<LoadedSession, FacadeError> {
        let handle = SessionHandle::new(session_id);
        let mut session = self.session(&handle)?;
        let mut flow_state = self.flow_state(&handle)?;

        let approved: Vec<_> = self
            .approved_texts(&handle)?
            .iter()
            .map(|t| t.question_type)
            .collect();
        if flow_state.reconcile_with_approved_texts(&approved) {
            info!("Reconciled flow state of {} with approved texts", session_id);
            session = self.save_flow_state(&handle, &flow_state)?;
        }

        Ok(LoadedSession {
            session,
            flow_state,
        })
    }

    /// Persist the final state of a session being closed
    pub fn close_session(&self, handle: &SessionHandle) -> Result<Session, FacadeError> {
        let flow_state = self.flow_state(handle)?;
        let session = self.save_flow_state(handle, &flow_state)?;
        debug!("Closed session {}", handle);
        Ok(session)
    }

    /// All sessions, most recently updated first
    pub fn list_sessions(&self) -> Result<Vec<Session>, FacadeError> {
        let mut sessions: Vec<Session> = self.store.list_all()?;
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }

    /// The most recently updated session still in progress, to offer a resume
    pub fn check_for_existing_session(&self) -> Result<Option<Session>, FacadeError> {
        Ok(self
            .list_sessions()?
            .into_iter()
            .find(|s| s.status == SessionStatus::InProgress))
    }

    pub fn rename_session(&self, handle: &SessionHandle, name: &str) -> Result<Session, FacadeError> {
        let mut session = self.session(handle)?;
        session.name = name.trim().to_string();
        session.touch();
        self.store.upsert(&session)?;
        Ok(session)
    }

    /// Delete a session and everything it owns
    pub fn delete_session(&self, handle: &SessionHandle) -> Result<usize, FacadeError> {
        self.session(handle)?;
        let removed = self.store.delete_session(handle.id())?;
        info!("Deleted session {} ({} records)", handle, removed);
        self.audit.log(AuditEvent::new(
            "session_deleted",
            json!({ "session_id": handle.id(), "records": removed }),
        ));
        Ok(removed)
    }

    // ==================== Shared helpers ====================

    pub fn session(&self, handle: &SessionHandle) -> Result<Session, FacadeError> {
        self.store
            .get::<Session>(handle.id())?
            .ok_or_else(|| FacadeError::SessionNotFound(handle.id().to_string()))
    }

    /// Stored flow state; a session without one starts from the initial state
    pub fn flow_state(&self, handle: &SessionHandle) -> Result<FlowState, FacadeError> {
        Ok(self
            .store
            .get::<FlowStateRecord>(handle.id())?
            .map(|r| r.state)
            .unwrap_or_default())
    }

    /// Persist the flow state and mirror it onto the session record.
    ///
    /// The two writes are not atomic; `load_session` repairs the flow state
    /// from approved texts if a crash leaves them inconsistent.
    pub(super) fn save_flow_state(
        &self,
        handle: &SessionHandle,
        state: &FlowState,
    ) -> Result<Session, FacadeError> {
        let mut session = self.session(handle)?;
        self.store.upsert(&FlowStateRecord {
            session_id: handle.id().to_string(),
            state: state.clone(),
        })?;
        let was_completed = session.is_completed();
        session.sync_with(state);
        self.store.upsert(&session)?;
        if session.is_completed() && !was_completed {
            info!("Session {} completed", handle);
            self.audit.log(AuditEvent::new(
                "session_completed",
                json!({ "session_id": handle.id() }),
            ));
        }
        Ok(session)
    }

    /// Apply a change to the flow state and persist it
    pub(super) fn update_flow_state<R>(
        &self,
        handle: &SessionHandle,
        change: impl FnOnce(&mut FlowState) -> Result<R, FacadeError>,
    ) -> Result<R, FacadeError> {
        let mut state = self.flow_state(handle)?;
        let result = change(&mut state)?;
        self.save_flow_state(handle, &state)?;
        Ok(result)
    }

    /// Refresh `updated_at` after a mutation that does not touch the flow state
    pub(super) fn touch(&self, handle: &SessionHandle) -> Result<(), FacadeError> {
        let mut session = self.session(handle)?;
        session.touch();
        self.store.upsert(&session)?;
        Ok(())
    }

    pub fn approved_texts(&self, handle: &SessionHandle) -> Result<Vec<ApprovedText>, FacadeError> {
        Ok(self.store.list(handle.id())?)
    }
}
