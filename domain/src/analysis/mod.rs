//! Theme analysis of free-text answers
//!
//! Themes come from the external analysis collaborator. The facilitator can
//! rename, describe or delete them before they feed proposals or goal clusters.

use crate::core::ids::{new_id, now};
use crate::core::question::QuestionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How widely a theme is shared among respondents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusLevel {
    Low,
    Medium,
    High,
}

impl ConsensusLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusLevel::High => "high",
            ConsensusLevel::Medium => "medium",
            ConsensusLevel::Low => "low",
        }
    }

    /// Confidence used when the collaborator does not report one
    pub fn default_confidence(&self) -> f64 {
        match self {
            ConsensusLevel::High => 0.9,
            ConsensusLevel::Medium => 0.6,
            ConsensusLevel::Low => 0.3,
        }
    }

    /// Level from the share of respondents mentioning a theme:
    /// above two thirds is high, below one third is low.
    pub fn from_share(mentioned: usize, respondents: usize) -> Self {
        if respondents == 0 {
            return ConsensusLevel::Low;
        }
        let share = mentioned as f64 / respondents as f64;
        if share > 2.0 / 3.0 {
            ConsensusLevel::High
        } else if share >= 1.0 / 3.0 {
            ConsensusLevel::Medium
        } else {
            ConsensusLevel::Low
        }
    }
}

impl fmt::Display for ConsensusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConsensusLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "hoog" => Ok(ConsensusLevel::High),
            "medium" | "gemiddeld" => Ok(ConsensusLevel::Medium),
            "low" | "laag" => Ok(ConsensusLevel::Low),
            other => Err(format!("Unknown consensus level: {}", other)),
        }
    }
}

/// A grouping of similar answers (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeCluster {
    pub id: String,
    pub name: String,
    pub description: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub related_responses: Vec<String>,
    #[serde(default)]
    pub mentioned_by: Vec<String>,
    pub consensus_level: ConsensusLevel,
    /// In `[0, 1]`
    pub ai_confidence: f64,
    #[serde(default)]
    pub example_quotes: Vec<String>,
}

/// Two themes pulling in different directions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tension {
    pub theme_a: String,
    pub theme_b: String,
    pub description: String,
}

/// Collaborator result for one question
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    #[serde(default)]
    pub themes: Vec<ThemeCluster>,
    #[serde(default)]
    pub tensions: Vec<Tension>,
    #[serde(default)]
    pub quick_wins: Vec<String>,
    #[serde(default)]
    pub discussion_points: Vec<String>,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

/// Persisted analysis, singleton per (session, question type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    pub id: String,
    pub session_id: String,
    pub question_type: QuestionType,
    pub analyzed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub analysis: Analysis,
}

impl StoredAnalysis {
    pub fn new(session_id: impl Into<String>, question_type: QuestionType, analysis: Analysis) -> Self {
        Self {
            id: new_id(),
            session_id: session_id.into(),
            question_type,
            analyzed_at: now(),
            analysis,
        }
    }

    pub fn theme(&self, theme_id: &str) -> Option<&ThemeCluster> {
        self.analysis.themes.iter().find(|t| t.id == theme_id)
    }

    fn theme_mut(&mut self, theme_id: &str) -> Option<&mut ThemeCluster> {
        self.analysis.themes.iter_mut().find(|t| t.id == theme_id)
    }

    /// Returns `false` if no theme has this id.
    pub fn rename_theme(&mut self, theme_id: &str, name: impl Into<String>) -> bool {
        match self.theme_mut(theme_id) {
            Some(theme) => {
                theme.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn describe_theme(&mut self, theme_id: &str, description: impl Into<String>) -> bool {
        match self.theme_mut(theme_id) {
            Some(theme) => {
                theme.description = description.into();
                true
            }
            None => false,
        }
    }

    pub fn delete_theme(&mut self, theme_id: &str) -> bool {
        let before = self.analysis.themes.len();
        self.analysis.themes.retain(|t| t.id != theme_id);
        self.analysis.themes.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(id: &str, name: &str) -> ThemeCluster {
        ThemeCluster {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            question_type: QuestionType::CurrentSituation,
            related_responses: vec![],
            mentioned_by: vec!["anne".into()],
            consensus_level: ConsensusLevel::Low,
            ai_confidence: 0.3,
            example_quotes: vec![],
        }
    }

    #[test]
    fn test_consensus_level_from_share() {
        assert_eq!(ConsensusLevel::from_share(3, 4), ConsensusLevel::High);
        assert_eq!(ConsensusLevel::from_share(2, 4), ConsensusLevel::Medium);
        assert_eq!(ConsensusLevel::from_share(1, 4), ConsensusLevel::Low);
        assert_eq!(ConsensusLevel::from_share(0, 0), ConsensusLevel::Low);
    }

    #[test]
    fn test_consensus_level_parse() {
        assert_eq!("HIGH".parse::<ConsensusLevel>().unwrap(), ConsensusLevel::High);
        assert_eq!("laag".parse::<ConsensusLevel>().unwrap(), ConsensusLevel::Low);
        assert!("unanimous".parse::<ConsensusLevel>().is_err());
    }

    #[test]
    fn test_theme_edits() {
        let mut stored = StoredAnalysis::new(
            "s1",
            QuestionType::CurrentSituation,
            Analysis {
                themes: vec![theme("t1", "Klant"), theme("t2", "Data")],
                ..Default::default()
            },
        );

        assert!(stored.rename_theme("t1", "Klantfocus"));
        assert!(stored.describe_theme("t1", "Focus op de klant"));
        assert_eq!(stored.theme("t1").unwrap().name, "Klantfocus");
        assert_eq!(stored.theme("t1").unwrap().description, "Focus op de klant");

        assert!(stored.delete_theme("t2"));
        assert!(!stored.delete_theme("t2"));
        assert!(!stored.rename_theme("t2", "x"));
        assert_eq!(stored.analysis.themes.len(), 1);
    }

    #[test]
    fn test_stored_analysis_serializes_flat() {
        let stored = StoredAnalysis::new("s1", QuestionType::Goal1, Analysis::default());
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["questionType"], "goal_1");
        assert!(json["themes"].is_array());
        assert!(json["analyzedAt"].is_string());
    }
}
