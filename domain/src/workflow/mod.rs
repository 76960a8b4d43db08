//! Workflow state machine.
//!
//! The facilitation runs through a fixed total order of eight steps:
//!
//! ```text
//! upload → visie_huidige → visie_gewenste → visie_beweging
//!        → visie_stakeholders → doelen → scope → export
//! ```
//!
//! Each step carries its own [`StepStatus`] (`locked → active → completed`),
//! and every topic step (four visie sub-steps, doelen, scope) carries a
//! [`SubStepState`] tracking analysis, voting and approval of that topic.
//!
//! - [`step`]: [`FlowStep`], [`StepStatus`] and the per-step status table
//! - [`sub_step`]: [`Topic`], [`SubStepStatus`], [`SubStepState`]
//! - [`state`]: [`FlowState`] and its transitions

pub mod state;
pub mod step;
pub mod sub_step;

pub use state::FlowState;
pub use step::{FLOW_ORDER, FlowStep, StepStatus, StepStatuses};
pub use sub_step::{SubStepState, SubStepStatus, SubSteps, Topic, VisieSubSteps};
