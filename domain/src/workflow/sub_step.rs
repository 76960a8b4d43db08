//! Per-topic sub-step state

use super::step::FlowStep;
use crate::analysis::ThemeCluster;
use crate::consensus::Vote;
use crate::core::question::QuestionType;
use crate::goals::GoalBoard;
use crate::proposal::Proposal;
use crate::scope::ScopeItem;
use serde::{Deserialize, Serialize};

/// A topic that goes through analysis, voting and approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    VisieHuidige,
    VisieGewenste,
    VisieBeweging,
    VisieStakeholders,
    Doelen,
    Scope,
}

impl Topic {
    /// Every topic that must be approved for the session to be complete
    pub const REQUIRED: [Topic; 6] = [
        Topic::VisieHuidige,
        Topic::VisieGewenste,
        Topic::VisieBeweging,
        Topic::VisieStakeholders,
        Topic::Doelen,
        Topic::Scope,
    ];

    pub fn step(&self) -> FlowStep {
        match self {
            Topic::VisieHuidige => FlowStep::VisieHuidige,
            Topic::VisieGewenste => FlowStep::VisieGewenste,
            Topic::VisieBeweging => FlowStep::VisieBeweging,
            Topic::VisieStakeholders => FlowStep::VisieStakeholders,
            Topic::Doelen => FlowStep::Doelen,
            Topic::Scope => FlowStep::Scope,
        }
    }

    pub fn for_step(step: FlowStep) -> Option<Topic> {
        Self::REQUIRED.into_iter().find(|t| t.step() == step)
    }

    /// The topic a question type belongs to
    pub fn for_question(question: QuestionType) -> Topic {
        match question {
            QuestionType::CurrentSituation => Topic::VisieHuidige,
            QuestionType::DesiredSituation => Topic::VisieGewenste,
            QuestionType::ChangeDirection => Topic::VisieBeweging,
            QuestionType::Stakeholders => Topic::VisieStakeholders,
            QuestionType::Goal1 | QuestionType::Goal2 | QuestionType::Goal3 => Topic::Doelen,
            QuestionType::OutOfScope => Topic::Scope,
        }
    }

    pub fn question_types(&self) -> &'static [QuestionType] {
        self.step().question_types()
    }
}

/// Progress of a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubStepStatus {
    #[default]
    NotStarted,
    Analyzing,
    Voting,
    Approved,
}

impl std::fmt::Display for SubStepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubStepStatus::NotStarted => "not_started",
            SubStepStatus::Analyzing => "analyzing",
            SubStepStatus::Voting => "voting",
            SubStepStatus::Approved => "approved",
        };
        write!(f, "{}", s)
    }
}

/// State of one topic, with optional caches of what the topic produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubStepState {
    pub status: SubStepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub themes: Option<Vec<ThemeCluster>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposals: Option<Vec<Proposal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_variant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<Vec<Vote>>,
    /// Goal clustering, dot ballots and ranking (doelen only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_board: Option<GoalBoard>,
    /// Scope items under categorisation (scope only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_items: Option<Vec<ScopeItem>>,
}

impl SubStepState {
    pub fn is_approved(&self) -> bool {
        self.status == SubStepStatus::Approved
    }

    /// Move the status forward. Returns `true` if it changed.
    pub fn advance_to(&mut self, status: SubStepStatus) -> bool {
        if status > self.status {
            self.status = status;
            true
        } else {
            false
        }
    }

    pub fn begin_analysis(&mut self) {
        self.advance_to(SubStepStatus::Analyzing);
    }

    pub fn set_themes(&mut self, themes: Vec<ThemeCluster>) {
        self.advance_to(SubStepStatus::Analyzing);
        self.themes = Some(themes);
    }

    pub fn set_proposals(&mut self, proposals: Vec<Proposal>) {
        self.advance_to(SubStepStatus::Voting);
        self.proposals = Some(proposals);
    }

    /// Cache a vote, replacing an earlier vote with the same key
    pub fn record_vote(&mut self, vote: Vote) {
        self.advance_to(SubStepStatus::Voting);
        let votes = self.votes.get_or_insert_with(Vec::new);
        votes.retain(|v| v.key() != vote.key());
        votes.push(vote);
    }

    pub fn approve(&mut self, text: impl Into<String>, variant_id: Option<String>) {
        self.status = SubStepStatus::Approved;
        self.approved_text = Some(text.into());
        self.approved_variant_id = variant_id;
    }
}

/// The four visie sub-steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisieSubSteps {
    pub huidige: SubStepState,
    pub gewenste: SubStepState,
    pub beweging: SubStepState,
    pub stakeholders: SubStepState,
}

/// Sub-step state of every topic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubSteps {
    pub visie: VisieSubSteps,
    pub doelen: SubStepState,
    pub scope: SubStepState,
}

impl SubSteps {
    pub fn get(&self, topic: Topic) -> &SubStepState {
        match topic {
            Topic::VisieHuidige => &self.visie.huidige,
            Topic::VisieGewenste => &self.visie.gewenste,
            Topic::VisieBeweging => &self.visie.beweging,
            Topic::VisieStakeholders => &self.visie.stakeholders,
            Topic::Doelen => &self.doelen,
            Topic::Scope => &self.scope,
        }
    }

    pub fn get_mut(&mut self, topic: Topic) -> &mut SubStepState {
        match topic {
            Topic::VisieHuidige => &mut self.visie.huidige,
            Topic::VisieGewenste => &mut self.visie.gewenste,
            Topic::VisieBeweging => &mut self.visie.beweging,
            Topic::VisieStakeholders => &mut self.visie.stakeholders,
            Topic::Doelen => &mut self.doelen,
            Topic::Scope => &mut self.scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_mapping() {
        assert_eq!(Topic::for_step(FlowStep::Doelen), Some(Topic::Doelen));
        assert_eq!(Topic::for_step(FlowStep::Upload), None);
        assert_eq!(Topic::for_step(FlowStep::Export), None);
        assert_eq!(Topic::for_question(QuestionType::Goal2), Topic::Doelen);
        assert_eq!(
            Topic::for_question(QuestionType::ChangeDirection),
            Topic::VisieBeweging
        );
    }

    #[test]
    fn test_status_only_advances() {
        let mut state = SubStepState::default();
        assert!(state.advance_to(SubStepStatus::Voting));
        assert!(!state.advance_to(SubStepStatus::Analyzing));
        assert_eq!(state.status, SubStepStatus::Voting);
    }

    #[test]
    fn test_approve_sets_text_and_status() {
        let mut state = SubStepState::default();
        state.approve("Shared wording", Some("variant-3".to_string()));
        assert!(state.is_approved());
        assert_eq!(state.approved_text.as_deref(), Some("Shared wording"));
        assert_eq!(state.approved_variant_id.as_deref(), Some("variant-3"));
    }

    #[test]
    fn test_empty_caches_are_not_serialized() {
        let json = serde_json::to_value(SubStepState::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "not_started" }));
    }
}
