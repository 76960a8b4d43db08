//! Flow steps and their statuses

use crate::core::error::DomainError;
use crate::core::question::QuestionType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One step of the facilitation flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    Upload,
    VisieHuidige,
    VisieGewenste,
    VisieBeweging,
    VisieStakeholders,
    Doelen,
    Scope,
    Export,
}

/// The total order of the flow
pub const FLOW_ORDER: [FlowStep; 8] = [
    FlowStep::Upload,
    FlowStep::VisieHuidige,
    FlowStep::VisieGewenste,
    FlowStep::VisieBeweging,
    FlowStep::VisieStakeholders,
    FlowStep::Doelen,
    FlowStep::Scope,
    FlowStep::Export,
];

impl FlowStep {
    /// Position in [`FLOW_ORDER`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Option<FlowStep> {
        FLOW_ORDER.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<FlowStep> {
        self.index().checked_sub(1).map(|i| FLOW_ORDER[i])
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStep::Upload => "upload",
            FlowStep::VisieHuidige => "visie_huidige",
            FlowStep::VisieGewenste => "visie_gewenste",
            FlowStep::VisieBeweging => "visie_beweging",
            FlowStep::VisieStakeholders => "visie_stakeholders",
            FlowStep::Doelen => "doelen",
            FlowStep::Scope => "scope",
            FlowStep::Export => "export",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlowStep::Upload => "Upload",
            FlowStep::VisieHuidige => "Huidige situatie",
            FlowStep::VisieGewenste => "Gewenste situatie",
            FlowStep::VisieBeweging => "Beweging",
            FlowStep::VisieStakeholders => "Belanghebbenden",
            FlowStep::Doelen => "Doelen",
            FlowStep::Scope => "Scope",
            FlowStep::Export => "Export",
        }
    }

    /// Question types whose approved texts this step produces
    pub fn question_types(&self) -> &'static [QuestionType] {
        match self {
            FlowStep::VisieHuidige => &[QuestionType::CurrentSituation],
            FlowStep::VisieGewenste => &[QuestionType::DesiredSituation],
            FlowStep::VisieBeweging => &[QuestionType::ChangeDirection],
            FlowStep::VisieStakeholders => &[QuestionType::Stakeholders],
            FlowStep::Doelen => &QuestionType::GOALS,
            FlowStep::Scope => &[QuestionType::OutOfScope],
            FlowStep::Upload | FlowStep::Export => &[],
        }
    }
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FlowStep {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        FLOW_ORDER
            .iter()
            .find(|step| step.as_str() == normalized)
            .copied()
            .ok_or_else(|| DomainError::UnknownFlowStep(s.to_string()))
    }
}

/// Status of a single step
///
/// Only ever moves forward: `Locked → Active → Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Locked,
    Active,
    Completed,
}

impl StepStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, StepStatus::Completed)
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, StepStatus::Locked)
    }
}

/// Status of every step, total over [`FLOW_ORDER`]
///
/// Serialized as a `step → status` map; deserialization rejects maps that
/// do not cover every step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<FlowStep, StepStatus>",
    into = "BTreeMap<FlowStep, StepStatus>"
)]
pub struct StepStatuses([StepStatus; 8]);

impl StepStatuses {
    /// `upload` active, everything else locked
    pub fn initial() -> Self {
        let mut statuses = [StepStatus::Locked; 8];
        statuses[FlowStep::Upload.index()] = StepStatus::Active;
        Self(statuses)
    }

    pub fn get(&self, step: FlowStep) -> StepStatus {
        self.0[step.index()]
    }

    /// Move a step's status forward; never moves it backward.
    ///
    /// Returns `true` if the status changed.
    pub(crate) fn promote(&mut self, step: FlowStep, to: StepStatus) -> bool {
        let slot = &mut self.0[step.index()];
        if to > *slot {
            *slot = to;
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FlowStep, StepStatus)> + '_ {
        FLOW_ORDER.iter().map(move |step| (*step, self.get(*step)))
    }
}

impl Default for StepStatuses {
    fn default() -> Self {
        Self::initial()
    }
}

impl From<StepStatuses> for BTreeMap<FlowStep, StepStatus> {
    fn from(value: StepStatuses) -> Self {
        value.iter().collect()
    }
}

impl TryFrom<BTreeMap<FlowStep, StepStatus>> for StepStatuses {
    type Error = String;

    fn try_from(map: BTreeMap<FlowStep, StepStatus>) -> Result<Self, Self::Error> {
        let mut statuses = [StepStatus::Locked; 8];
        for step in FLOW_ORDER {
            statuses[step.index()] = *map
                .get(&step)
                .ok_or_else(|| format!("missing status for step '{}'", step))?;
        }
        Ok(Self(statuses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_neighbours() {
        assert_eq!(FlowStep::Upload.index(), 0);
        assert_eq!(FlowStep::Export.index(), 7);
        assert_eq!(FlowStep::Upload.next(), Some(FlowStep::VisieHuidige));
        assert_eq!(FlowStep::Export.next(), None);
        assert_eq!(FlowStep::Upload.previous(), None);
        assert_eq!(FlowStep::Scope.previous(), Some(FlowStep::Doelen));
    }

    #[test]
    fn test_order_matches_indices() {
        for (i, step) in FLOW_ORDER.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
    }

    #[test]
    fn test_parse_step() {
        assert_eq!("doelen".parse::<FlowStep>().ok(), Some(FlowStep::Doelen));
        assert_eq!(
            "visie-gewenste".parse::<FlowStep>().ok(),
            Some(FlowStep::VisieGewenste)
        );
        assert!("visie".parse::<FlowStep>().is_err());
    }

    #[test]
    fn test_promote_never_moves_backward() {
        let mut statuses = StepStatuses::initial();
        assert!(statuses.promote(FlowStep::Doelen, StepStatus::Active));
        assert!(statuses.promote(FlowStep::Doelen, StepStatus::Completed));
        assert!(!statuses.promote(FlowStep::Doelen, StepStatus::Active));
        assert_eq!(statuses.get(FlowStep::Doelen), StepStatus::Completed);
    }

    #[test]
    fn test_statuses_serde_roundtrip_as_map() {
        let statuses = StepStatuses::initial();
        let json = serde_json::to_value(&statuses).unwrap();
        assert_eq!(json["upload"], "active");
        assert_eq!(json["export"], "locked");
        let back: StepStatuses = serde_json::from_value(json).unwrap();
        assert_eq!(back, statuses);
    }

    #[test]
    fn test_statuses_reject_incomplete_map() {
        let json = serde_json::json!({ "upload": "active" });
        assert!(serde_json::from_value::<StepStatuses>(json).is_err());
    }
}
