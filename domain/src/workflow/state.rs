//! Flow state and its transitions

use super::step::{FLOW_ORDER, FlowStep, StepStatus, StepStatuses};
use super::sub_step::{SubStepState, SubStepStatus, SubSteps, Topic};
use crate::core::error::DomainError;
use crate::core::question::QuestionType;
use serde::{Deserialize, Serialize};

/// Where a session stands in the flow (Entity, one per session)
///
/// Exactly one step is current. Step statuses only move forward; navigating
/// backward for review changes `current_step` and nothing else.
///
/// # Example
///
/// ```
/// use consent_domain::workflow::{FlowState, FlowStep};
///
/// let mut state = FlowState::initial();
/// assert!(!state.can_proceed_to(FlowStep::VisieHuidige));
///
/// state.complete_step(FlowStep::Upload);
/// assert!(state.can_proceed_to(FlowStep::VisieHuidige));
/// assert!(!state.can_proceed_to(FlowStep::VisieGewenste));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowState {
    pub current_step: FlowStep,
    pub steps: StepStatuses,
    #[serde(flatten)]
    pub sub_steps: SubSteps,
}

impl Default for FlowState {
    fn default() -> Self {
        Self::initial()
    }
}

impl FlowState {
    /// `upload` current and active, all other steps locked, all topics not started
    pub fn initial() -> Self {
        Self {
            current_step: FlowStep::Upload,
            steps: StepStatuses::initial(),
            sub_steps: SubSteps::default(),
        }
    }

    pub fn status(&self, step: FlowStep) -> StepStatus {
        self.steps.get(step)
    }

    pub fn sub_step(&self, topic: Topic) -> &SubStepState {
        self.sub_steps.get(topic)
    }

    pub fn sub_step_mut(&mut self, topic: Topic) -> &mut SubStepState {
        self.sub_steps.get_mut(topic)
    }

    /// Forward-progress guard.
    ///
    /// Any step at or before the current step is reachable. A later step is
    /// reachable only when every step strictly before it is completed.
    pub fn can_proceed_to(&self, target: FlowStep) -> bool {
        if target.index() <= self.current_step.index() {
            return true;
        }
        FLOW_ORDER[..target.index()]
            .iter()
            .all(|step| self.status(*step).is_completed())
    }

    /// Mark a step completed. Does not move `current_step`.
    ///
    /// A locked step is left untouched and `false` is returned: a step
    /// reaches `completed` only by way of `active`.
    pub fn complete_step(&mut self, step: FlowStep) -> bool {
        if self.status(step).is_locked() {
            return false;
        }
        self.steps.promote(step, StepStatus::Completed)
    }

    /// Promote a locked step to active; no-op for active or completed steps.
    pub fn unlock_step(&mut self, step: FlowStep) -> bool {
        if !self.status(step).is_locked() {
            return false;
        }
        self.steps.promote(step, StepStatus::Active)
    }

    /// Change the current step without touching any status.
    pub fn set_current_step(&mut self, step: FlowStep) {
        self.current_step = step;
    }

    /// Complete the current step, unlock the next one and make it current.
    pub fn advance(&mut self) -> Result<FlowStep, DomainError> {
        let next = self.current_step.next().ok_or(DomainError::NoNextStep)?;
        if self.status(self.current_step).is_locked() {
            return Err(DomainError::StepLocked(self.current_step));
        }

        // Check reachability against a copy so a refused advance leaves no trace
        let mut probe = self.clone();
        probe.complete_step(probe.current_step);
        if !probe.can_proceed_to(next) {
            return Err(DomainError::StepNotReachable { target: next });
        }

        *self = probe;
        self.unlock_step(next);
        self.set_current_step(next);
        Ok(next)
    }

    /// Derived terminal condition: every required topic approved.
    pub fn is_session_complete(&self) -> bool {
        Topic::REQUIRED
            .iter()
            .all(|topic| self.sub_step(*topic).is_approved())
    }

    /// Repair cached statuses from the approved texts actually stored.
    ///
    /// A topic whose question types all have an approved text is marked
    /// approved and its step completed (and unlocked first if needed). The
    /// doelen topic counts as approved once `goal_1` is present, since a
    /// partial ranking is a valid approval. Statuses only move forward.
    ///
    /// Returns `true` if anything changed.
    pub fn reconcile_with_approved_texts(&mut self, approved: &[QuestionType]) -> bool {
        let mut changed = false;
        for topic in Topic::REQUIRED {
            let satisfied = match topic {
                Topic::Doelen => approved.contains(&QuestionType::Goal1),
                _ => topic.question_types().iter().all(|q| approved.contains(q)),
            };
            if !satisfied {
                continue;
            }
            changed |= self
                .sub_step_mut(topic)
                .advance_to(SubStepStatus::Approved);
            changed |= self.steps.promote(topic.step(), StepStatus::Active);
            changed |= self.steps.promote(topic.step(), StepStatus::Completed);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed_through(last: FlowStep) -> FlowState {
        let mut state = FlowState::initial();
        for step in FLOW_ORDER.iter().take(last.index() + 1) {
            state.unlock_step(*step);
            state.complete_step(*step);
        }
        state
    }

    #[test]
    fn test_initial_state() {
        let state = FlowState::initial();
        assert_eq!(state.current_step, FlowStep::Upload);
        assert_eq!(state.status(FlowStep::Upload), StepStatus::Active);
        for step in &FLOW_ORDER[1..] {
            assert_eq!(state.status(*step), StepStatus::Locked);
        }
        for topic in Topic::REQUIRED {
            assert_eq!(state.sub_step(topic).status, SubStepStatus::NotStarted);
        }
    }

    #[test]
    fn test_forward_gating() {
        let state = completed_through(FlowStep::VisieHuidige);
        assert!(state.can_proceed_to(FlowStep::VisieGewenste));
        assert!(!state.can_proceed_to(FlowStep::Doelen));
    }

    #[test]
    fn test_backward_is_always_allowed() {
        let mut state = FlowState::initial();
        state.set_current_step(FlowStep::Scope);
        for step in FLOW_ORDER.iter().take(FlowStep::Scope.index() + 1) {
            assert!(state.can_proceed_to(*step));
        }
        assert!(!state.can_proceed_to(FlowStep::Export));
    }

    #[test]
    fn test_complete_locked_step_is_noop() {
        let mut state = FlowState::initial();
        assert!(!state.complete_step(FlowStep::Doelen));
        assert_eq!(state.status(FlowStep::Doelen), StepStatus::Locked);
    }

    #[test]
    fn test_unlock_only_promotes_locked() {
        let mut state = FlowState::initial();
        assert!(state.unlock_step(FlowStep::VisieHuidige));
        assert!(!state.unlock_step(FlowStep::VisieHuidige));
        state.complete_step(FlowStep::VisieHuidige);
        assert!(!state.unlock_step(FlowStep::VisieHuidige));
        assert_eq!(state.status(FlowStep::VisieHuidige), StepStatus::Completed);
    }

    #[test]
    fn test_complete_does_not_advance() {
        let mut state = FlowState::initial();
        state.complete_step(FlowStep::Upload);
        assert_eq!(state.current_step, FlowStep::Upload);
    }

    #[test]
    fn test_set_current_step_keeps_statuses() {
        let mut state = completed_through(FlowStep::VisieGewenste);
        let before = state.steps.clone();
        state.set_current_step(FlowStep::Upload);
        assert_eq!(state.steps, before);
        assert_eq!(state.current_step, FlowStep::Upload);
    }

    #[test]
    fn test_advance_walks_the_flow() {
        let mut state = FlowState::initial();
        for expected in &FLOW_ORDER[1..] {
            assert_eq!(state.advance().unwrap(), *expected);
            assert_eq!(state.current_step, *expected);
            assert_eq!(state.status(*expected), StepStatus::Active);
        }
        assert_eq!(state.advance(), Err(DomainError::NoNextStep));
    }

    #[test]
    fn test_advance_refuses_when_earlier_step_incomplete() {
        let mut state = FlowState::initial();
        // Jump ahead for review without completing anything
        state.unlock_step(FlowStep::VisieHuidige);
        state.set_current_step(FlowStep::VisieHuidige);
        let before = state.clone();
        assert_eq!(
            state.advance(),
            Err(DomainError::StepNotReachable {
                target: FlowStep::VisieGewenste
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_session_complete_is_derived() {
        let mut state = FlowState::initial();
        assert!(!state.is_session_complete());
        for topic in Topic::REQUIRED {
            state.sub_step_mut(topic).approve("ok", None);
        }
        assert!(state.is_session_complete());
    }

    #[test]
    fn test_reconcile_marks_topics_from_approved_texts() {
        let mut state = FlowState::initial();
        let approved = [QuestionType::CurrentSituation, QuestionType::Goal1];
        assert!(state.reconcile_with_approved_texts(&approved));

        assert!(state.sub_step(Topic::VisieHuidige).is_approved());
        assert_eq!(state.status(FlowStep::VisieHuidige), StepStatus::Completed);
        assert!(state.sub_step(Topic::Doelen).is_approved());
        assert!(!state.sub_step(Topic::Scope).is_approved());

        assert!(!state.reconcile_with_approved_texts(&approved));
    }

    #[test]
    fn test_flow_state_serde_shape() {
        let state = FlowState::initial();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["currentStep"], "upload");
        assert_eq!(json["steps"]["visie_huidige"], "locked");
        assert_eq!(json["visie"]["huidige"]["status"], "not_started");
        assert_eq!(json["doelen"]["status"], "not_started");

        let back: FlowState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
