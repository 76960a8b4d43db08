//! Question types of the respondent canvas

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// One of the eight fixed canvas questions (Value Object)
///
/// Every uploaded canvas answers all eight; an answer may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    CurrentSituation,
    DesiredSituation,
    ChangeDirection,
    Stakeholders,
    #[serde(rename = "goal_1")]
    Goal1,
    #[serde(rename = "goal_2")]
    Goal2,
    #[serde(rename = "goal_3")]
    Goal3,
    OutOfScope,
}

/// Which part of the final document a question feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Visie,
    Doelen,
    Scope,
}

impl QuestionType {
    /// All question types in canvas order
    pub const ALL: [QuestionType; 8] = [
        QuestionType::CurrentSituation,
        QuestionType::DesiredSituation,
        QuestionType::ChangeDirection,
        QuestionType::Stakeholders,
        QuestionType::Goal1,
        QuestionType::Goal2,
        QuestionType::Goal3,
        QuestionType::OutOfScope,
    ];

    /// The goal questions, highest priority first
    pub const GOALS: [QuestionType; 3] =
        [QuestionType::Goal1, QuestionType::Goal2, QuestionType::Goal3];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::CurrentSituation => "current_situation",
            QuestionType::DesiredSituation => "desired_situation",
            QuestionType::ChangeDirection => "change_direction",
            QuestionType::Stakeholders => "stakeholders",
            QuestionType::Goal1 => "goal_1",
            QuestionType::Goal2 => "goal_2",
            QuestionType::Goal3 => "goal_3",
            QuestionType::OutOfScope => "out_of_scope",
        }
    }

    /// Label shown to the group
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::CurrentSituation => "A: Huidige situatie",
            QuestionType::DesiredSituation => "B: Gewenste situatie",
            QuestionType::ChangeDirection => "C: Beweging/verandering",
            QuestionType::Stakeholders => "D: Belanghebbenden",
            QuestionType::Goal1 => "Doel 1 (hoogste prioriteit)",
            QuestionType::Goal2 => "Doel 2",
            QuestionType::Goal3 => "Doel 3",
            QuestionType::OutOfScope => "Buiten scope",
        }
    }

    pub fn category(&self) -> QuestionCategory {
        match self {
            QuestionType::CurrentSituation
            | QuestionType::DesiredSituation
            | QuestionType::ChangeDirection
            | QuestionType::Stakeholders => QuestionCategory::Visie,
            QuestionType::Goal1 | QuestionType::Goal2 | QuestionType::Goal3 => {
                QuestionCategory::Doelen
            }
            QuestionType::OutOfScope => QuestionCategory::Scope,
        }
    }

    /// Goal question for a 1-based rank (`1..=3`)
    pub fn goal_for_rank(rank: usize) -> Option<QuestionType> {
        rank.checked_sub(1)
            .and_then(|i| Self::GOALS.get(i))
            .copied()
    }

    /// 1-based rank of a goal question
    pub fn goal_rank(&self) -> Option<u8> {
        match self {
            QuestionType::Goal1 => Some(1),
            QuestionType::Goal2 => Some(2),
            QuestionType::Goal3 => Some(3),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuestionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .find(|q| q.as_str() == normalized)
            .copied()
            .ok_or_else(|| DomainError::UnknownQuestionType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_question_type() {
        assert_eq!(
            "current_situation".parse::<QuestionType>().ok(),
            Some(QuestionType::CurrentSituation)
        );
        assert_eq!("goal-2".parse::<QuestionType>().ok(), Some(QuestionType::Goal2));
        assert!("goals".parse::<QuestionType>().is_err());
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for q in QuestionType::ALL {
            let json = serde_json::to_string(&q).unwrap();
            assert_eq!(json, format!("\"{}\"", q.as_str()));
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(QuestionType::Stakeholders.category(), QuestionCategory::Visie);
        assert_eq!(QuestionType::Goal3.category(), QuestionCategory::Doelen);
        assert_eq!(QuestionType::OutOfScope.category(), QuestionCategory::Scope);
    }

    #[test]
    fn test_goal_ranks() {
        assert_eq!(QuestionType::goal_for_rank(1), Some(QuestionType::Goal1));
        assert_eq!(QuestionType::goal_for_rank(3), Some(QuestionType::Goal3));
        assert_eq!(QuestionType::goal_for_rank(0), None);
        assert_eq!(QuestionType::goal_for_rank(4), None);
        assert_eq!(QuestionType::Goal2.goal_rank(), Some(2));
        assert_eq!(QuestionType::OutOfScope.goal_rank(), None);
    }
}
