//! Respondent canvases
//!
//! A [`Document`] is one respondent's submitted canvas: the raw extracted text
//! plus an answer for each of the eight [`QuestionType`]s.

use crate::core::ids::{new_id, now};
use crate::core::question::QuestionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Answers per question type. Missing questions read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanvasResponses(BTreeMap<QuestionType, String>);

impl CanvasResponses {
    pub fn get(&self, question: QuestionType) -> &str {
        self.0.get(&question).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, question: QuestionType, answer: impl Into<String>) {
        self.0.insert(question, answer.into());
    }

    /// Every question type in canvas order, empty answers included
    pub fn iter(&self) -> impl Iterator<Item = (QuestionType, &str)> + '_ {
        QuestionType::ALL.iter().map(move |q| (*q, self.get(*q)))
    }

    pub fn answered(&self) -> usize {
        self.0.values().filter(|a| !a.trim().is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.answered() == 0
    }
}

impl FromIterator<(QuestionType, String)> for CanvasResponses {
    fn from_iter<I: IntoIterator<Item = (QuestionType, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One uploaded respondent canvas (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub session_id: String,
    pub filename: String,
    pub respondent_id: String,
    pub uploaded_at: DateTime<Utc>,
    pub raw_text: String,
    pub parsed_responses: CanvasResponses,
}

impl Document {
    pub fn new(
        session_id: impl Into<String>,
        filename: impl Into<String>,
        respondent_id: impl Into<String>,
        raw_text: impl Into<String>,
        responses: CanvasResponses,
    ) -> Self {
        Self {
            id: new_id(),
            session_id: session_id.into(),
            filename: filename.into(),
            respondent_id: respondent_id.into(),
            uploaded_at: now(),
            raw_text: raw_text.into(),
            parsed_responses: responses,
        }
    }

    pub fn answer(&self, question: QuestionType) -> &str {
        self.parsed_responses.get(question)
    }

    /// Manual field correction by the facilitator
    pub fn set_answer(&mut self, question: QuestionType, answer: impl Into<String>) {
        self.parsed_responses.set(question, answer);
    }
}

/// `(respondent, answer)` pairs for one question, skipping empty answers
pub fn answers_for(documents: &[Document], question: QuestionType) -> Vec<(&str, &str)> {
    documents
        .iter()
        .map(|d| (d.respondent_id.as_str(), d.answer(question)))
        .filter(|(_, a)| !a.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_answer_reads_empty() {
        let responses = CanvasResponses::default();
        assert_eq!(responses.get(QuestionType::Stakeholders), "");
        assert!(responses.is_empty());
        assert_eq!(responses.iter().count(), 8);
    }

    #[test]
    fn test_manual_correction() {
        let mut doc = Document::new("s1", "roel.docx", "Roel", "text", CanvasResponses::default());
        doc.set_answer(QuestionType::Goal1, "Klant centraal");
        assert_eq!(doc.answer(QuestionType::Goal1), "Klant centraal");
        assert_eq!(doc.parsed_responses.answered(), 1);
    }

    #[test]
    fn test_responses_serialize_as_map() {
        let mut responses = CanvasResponses::default();
        responses.set(QuestionType::Goal2, "b");
        let json = serde_json::to_value(&responses).unwrap();
        assert_eq!(json, serde_json::json!({ "goal_2": "b" }));
        let back: CanvasResponses = serde_json::from_value(json).unwrap();
        assert_eq!(back, responses);
    }

    #[test]
    fn test_answers_for_skips_empty() {
        let mut a = CanvasResponses::default();
        a.set(QuestionType::OutOfScope, "HR");
        let docs = vec![
            Document::new("s", "a", "anne", "", a),
            Document::new("s", "b", "bert", "", CanvasResponses::default()),
        ];
        assert_eq!(answers_for(&docs, QuestionType::OutOfScope), vec![("anne", "HR")]);
    }
}
