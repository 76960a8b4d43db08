//! Final vision / goals / scope document

use super::{ApprovedText, SCOPE_FINAL_VARIANT, SCOPE_SOURCE};
use crate::core::ids::{new_id, now};
use crate::core::question::QuestionType;
use crate::scope::parse_scope_text;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source reference for texts restored from an exported document
pub const IMPORT_SOURCE: &str = "import";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionSection {
    pub current_situation: String,
    pub desired_situation: String,
    pub change_direction: String,
    pub stakeholders: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalEntry {
    pub rank: u8,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeSection {
    pub out_of_scope: Vec<String>,
}

/// Snapshot of every approved text at export time, one per session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalDocument {
    pub id: String,
    pub session_id: String,
    pub vision: VisionSection,
    pub goals: Vec<GoalEntry>,
    pub scope: ScopeSection,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

impl FinalDocument {
    /// Project the approved texts of a session. Missing texts read as empty;
    /// goals without an approved text are left out.
    pub fn from_approved_texts(session_id: impl Into<String>, texts: &[ApprovedText]) -> Self {
        let text_for = |q: QuestionType| -> Option<&str> {
            texts.iter().find(|t| t.question_type == q).map(|t| t.text.as_str())
        };
        let vision_text = |q: QuestionType| text_for(q).unwrap_or("").to_string();

        let goals = QuestionType::GOALS
            .iter()
            .filter_map(|q| {
                let text = text_for(*q)?;
                Some(GoalEntry {
                    rank: q.goal_rank()?,
                    text: text.to_string(),
                })
            })
            .collect();

        Self {
            id: new_id(),
            session_id: session_id.into(),
            vision: VisionSection {
                current_situation: vision_text(QuestionType::CurrentSituation),
                desired_situation: vision_text(QuestionType::DesiredSituation),
                change_direction: vision_text(QuestionType::ChangeDirection),
                stakeholders: vision_text(QuestionType::Stakeholders),
            },
            goals,
            scope: ScopeSection {
                out_of_scope: text_for(QuestionType::OutOfScope)
                    .map(parse_scope_text)
                    .unwrap_or_default(),
            },
            generated_at: now(),
            exported_at: None,
        }
    }

    pub fn mark_exported(&mut self) {
        self.exported_at = Some(now());
    }

    /// Approved texts that reproduce this document, for re-import into a session
    pub fn to_approved_texts(&self, session_id: &str) -> Vec<ApprovedText> {
        let mut texts = Vec::new();
        let vision = [
            (QuestionType::CurrentSituation, &self.vision.current_situation),
            (QuestionType::DesiredSituation, &self.vision.desired_situation),
            (QuestionType::ChangeDirection, &self.vision.change_direction),
            (QuestionType::Stakeholders, &self.vision.stakeholders),
        ];
        for (question, text) in vision {
            if !text.is_empty() {
                texts.push(ApprovedText::new(session_id, question, text.as_str(), IMPORT_SOURCE, IMPORT_SOURCE));
            }
        }
        for goal in &self.goals {
            if let Some(question) = QuestionType::goal_for_rank(usize::from(goal.rank)) {
                texts.push(ApprovedText::new(session_id, question, goal.text.as_str(), IMPORT_SOURCE, IMPORT_SOURCE));
            }
        }
        if !self.scope.out_of_scope.is_empty() {
            let text = self
                .scope
                .out_of_scope
                .iter()
                .map(|item| format!("• {}", item))
                .collect::<Vec<_>>()
                .join("\n");
            texts.push(ApprovedText::new(
                session_id,
                QuestionType::OutOfScope,
                text,
                SCOPE_SOURCE,
                SCOPE_FINAL_VARIANT,
            ));
        }
        texts
    }

    pub fn is_complete(&self) -> bool {
        let v = &self.vision;
        [&v.current_situation, &v.desired_situation, &v.change_direction, &v.stakeholders]
            .iter()
            .all(|t| !t.is_empty())
            && !self.goals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved(q: QuestionType, text: &str) -> ApprovedText {
        ApprovedText::new("s1", q, text, "p", "v")
    }

    fn texts() -> Vec<ApprovedText> {
        vec![
            approved(QuestionType::CurrentSituation, "Nu"),
            approved(QuestionType::DesiredSituation, "Straks"),
            approved(QuestionType::ChangeDirection, "Beweging"),
            approved(QuestionType::Stakeholders, "Iedereen"),
            approved(QuestionType::Goal1, "Doel een"),
            approved(QuestionType::Goal3, "Doel drie"),
            approved(QuestionType::OutOfScope, "• HR\n• Financiën"),
        ]
    }

    #[test]
    fn test_projection() {
        let doc = FinalDocument::from_approved_texts("s1", &texts());
        assert_eq!(doc.vision.change_direction, "Beweging");
        assert_eq!(
            doc.goals,
            vec![
                GoalEntry { rank: 1, text: "Doel een".into() },
                GoalEntry { rank: 3, text: "Doel drie".into() },
            ]
        );
        assert_eq!(doc.scope.out_of_scope, vec!["HR", "Financiën"]);
        assert!(doc.is_complete());
        assert!(doc.exported_at.is_none());
    }

    #[test]
    fn test_missing_texts_read_empty() {
        let doc = FinalDocument::from_approved_texts("s1", &[]);
        assert_eq!(doc.vision, VisionSection::default());
        assert!(doc.goals.is_empty());
        assert!(doc.scope.out_of_scope.is_empty());
        assert!(!doc.is_complete());
    }

    #[test]
    fn test_reimport_reproduces_fields() {
        let doc = FinalDocument::from_approved_texts("s1", &texts());
        let json = serde_json::to_string(&doc).unwrap();
        let parsed: FinalDocument = serde_json::from_str(&json).unwrap();

        let restored = FinalDocument::from_approved_texts("s2", &parsed.to_approved_texts("s2"));
        assert_eq!(restored.vision, doc.vision);
        assert_eq!(restored.goals, doc.goals);
        assert_eq!(restored.scope, doc.scope);
    }
}
