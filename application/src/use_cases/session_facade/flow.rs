//! Flow navigation.
//!
//! Forward moves are checked against `can_proceed_to` here, at the boundary;
//! a refused move leaves the stored state untouched.

use super::{FacadeError, SessionFacade};
use crate::ports::audit_log::AuditEvent;
use consent_domain::{DomainError, FlowState, FlowStep, SessionHandle};
use serde_json::json;
use tracing::info;

impl SessionFacade {
    /// Navigate to a step. Backward moves are always allowed; a forward move
    /// requires every earlier step to be completed and unlocks the target.
    pub fn set_current_step(
        &self,
        handle: &SessionHandle,
        step: FlowStep,
    ) -> Result<FlowState, FacadeError> {
        self.update_flow_state(handle, |state| {
            if !state.can_proceed_to(step) {
                return Err(DomainError::StepNotReachable { target: step }.into());
            }
            state.unlock_step(step);
            state.set_current_step(step);
            Ok(state.clone())
        })
    }

    /// Mark a step completed without moving the current step
    pub fn complete_step(
        &self,
        handle: &SessionHandle,
        step: FlowStep,
    ) -> Result<FlowState, FacadeError> {
        let state = self.update_flow_state(handle, |state| {
            if state.status(step).is_locked() {
                return Err(DomainError::StepLocked(step).into());
            }
            state.complete_step(step);
            Ok(state.clone())
        })?;
        info!("Completed step {} in session {}", step, handle);
        self.audit.log(AuditEvent::new(
            "step_completed",
            json!({ "session_id": handle.id(), "step": step.as_str() }),
        ));
        Ok(state)
    }

    pub fn unlock_step(
        &self,
        handle: &SessionHandle,
        step: FlowStep,
    ) -> Result<FlowState, FacadeError> {
        self.update_flow_state(handle, |state| {
            state.unlock_step(step);
            Ok(state.clone())
        })
    }

    /// Complete the current step, unlock the next and move to it
    pub fn advance(&self, handle: &SessionHandle) -> Result<FlowState, FacadeError> {
        let from = self.flow_state(handle)?.current_step;
        let state = self.update_flow_state(handle, |state| {
            state.advance()?;
            Ok(state.clone())
        })?;
        info!("Session {} moved {} → {}", handle, from, state.current_step);
        self.audit.log(AuditEvent::new(
            "step_completed",
            json!({ "session_id": handle.id(), "step": from.as_str() }),
        ));
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::facade;
    use consent_domain::{DomainError, FlowStep, StepStatus};
    use crate::use_cases::session_facade::FacadeError;

    #[test]
    fn test_forward_navigation_is_gated() {
        let facade = facade();
        let handle = facade.create_session("s").unwrap().session.handle();

        let err = facade.set_current_step(&handle, FlowStep::VisieHuidige).unwrap_err();
        assert!(matches!(
            err,
            FacadeError::Domain(DomainError::StepNotReachable { target: FlowStep::VisieHuidige })
        ));
        assert_eq!(facade.flow_state(&handle).unwrap().current_step, FlowStep::Upload);

        facade.complete_step(&handle, FlowStep::Upload).unwrap();
        let state = facade.set_current_step(&handle, FlowStep::VisieHuidige).unwrap();
        assert_eq!(state.current_step, FlowStep::VisieHuidige);
        assert_eq!(state.status(FlowStep::VisieHuidige), StepStatus::Active);
        assert_eq!(
            facade.session(&handle).unwrap().current_step,
            FlowStep::VisieHuidige
        );
    }

    #[test]
    fn test_backward_navigation_keeps_statuses() {
        let facade = facade();
        let handle = facade.create_session("s").unwrap().session.handle();
        facade.advance(&handle).unwrap();
        let state = facade.set_current_step(&handle, FlowStep::Upload).unwrap();
        assert_eq!(state.current_step, FlowStep::Upload);
        assert_eq!(state.status(FlowStep::Upload), StepStatus::Completed);
        assert_eq!(state.status(FlowStep::VisieHuidige), StepStatus::Active);
    }

    #[test]
    fn test_complete_locked_step_is_rejected() {
        let facade = facade();
        let handle = facade.create_session("s").unwrap().session.handle();
        assert!(matches!(
            facade.complete_step(&handle, FlowStep::Doelen),
            Err(FacadeError::Domain(DomainError::StepLocked(FlowStep::Doelen)))
        ));
        facade.unlock_step(&handle, FlowStep::Doelen).unwrap();
        let state = facade.complete_step(&handle, FlowStep::Doelen).unwrap();
        assert!(state.status(FlowStep::Doelen).is_completed());
    }

    #[test]
    fn test_advance_refused_when_current_step_blocks() {
        let facade = facade();
        let handle = facade.create_session("s").unwrap().session.handle();
        let state = facade.advance(&handle).unwrap();
        assert_eq!(state.current_step, FlowStep::VisieHuidige);

        // jump back to upload: visie_huidige is not completed, so doelen stays out of reach
        facade.set_current_step(&handle, FlowStep::Upload).unwrap();
        assert!(facade.set_current_step(&handle, FlowStep::Doelen).is_err());
    }
}
