//! Cross-respondent consensus detection for the comparison matrix.
//!
//! A deliberately coarse textual overlap count, so the matrix is
//! deterministic and testable:
//!
//! 1. Keywords of an answer are its whitespace-separated words, lowercased,
//!    longer than four characters.
//! 2. Two respondents match when they share at least two distinct keywords.
//! 3. With `N` = respondents with a non-empty answer, a cell is
//!    `Consensus` when it matches at least `floor(N / 2)` others, `Unique`
//!    when it matches none, `Neutral` otherwise. Empty answers are always
//!    `Neutral`.

use crate::core::question::QuestionType;
use crate::document::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Words an answer must share with another to count as a match
const MIN_SHARED_KEYWORDS: usize = 2;

/// Minimum character count (exclusive) for a word to be a keyword
const MIN_KEYWORD_CHARS: usize = 4;

/// Classification of one matrix cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellConsensus {
    Consensus,
    Unique,
    Neutral,
}

/// Lowercased words longer than four characters, in order of appearance
pub fn keywords(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_KEYWORD_CHARS)
        .map(str::to_string)
        .collect()
}

/// Classify each answer against all others.
///
/// The result has one entry per input answer, in input order.
///
/// # Example
///
/// ```
/// use consent_domain::consensus::{CellConsensus, consensus_cells};
///
/// let cells = consensus_cells(&[
///     "klanten centraal partner denken",
///     "partner zijn voor klanten",
///     "",
/// ]);
/// assert_eq!(cells[0], CellConsensus::Consensus);
/// assert_eq!(cells[2], CellConsensus::Neutral);
/// ```
pub fn consensus_cells<S: AsRef<str>>(answers: &[S]) -> Vec<CellConsensus> {
    let keyword_sets: Vec<BTreeSet<String>> = answers
        .iter()
        .map(|a| keywords(a.as_ref()).into_iter().collect())
        .collect();

    let answered = answers
        .iter()
        .filter(|a| !a.as_ref().trim().is_empty())
        .count();
    let threshold = answered / 2;

    answers
        .iter()
        .enumerate()
        .map(|(index, answer)| {
            if answer.as_ref().trim().is_empty() {
                return CellConsensus::Neutral;
            }

            let mine = &keyword_sets[index];
            let match_count = keyword_sets
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .filter(|(_, theirs)| mine.intersection(theirs).count() >= MIN_SHARED_KEYWORDS)
                .count();

            if match_count >= threshold {
                CellConsensus::Consensus
            } else if match_count == 0 {
                CellConsensus::Unique
            } else {
                CellConsensus::Neutral
            }
        })
        .collect()
}

/// One respondent's answer to one question, classified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixCell {
    pub respondent_id: String,
    pub answer: String,
    pub level: CellConsensus,
}

/// All answers to one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    pub question: QuestionType,
    pub cells: Vec<MatrixCell>,
}

impl MatrixRow {
    pub fn count(&self, level: CellConsensus) -> usize {
        self.cells.iter().filter(|c| c.level == level).count()
    }
}

/// Questions × respondents comparison matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusMatrix {
    pub rows: Vec<MatrixRow>,
}

impl ConsensusMatrix {
    /// Build the matrix for the given questions, one column per document
    pub fn build(documents: &[Document], questions: &[QuestionType]) -> Self {
        let rows = questions
            .iter()
            .map(|question| {
                let answers: Vec<&str> = documents.iter().map(|d| d.answer(*question)).collect();
                let levels = consensus_cells(&answers);
                let cells = documents
                    .iter()
                    .zip(levels)
                    .map(|(doc, level)| MatrixCell {
                        respondent_id: doc.respondent_id.clone(),
                        answer: doc.answer(*question).to_string(),
                        level,
                    })
                    .collect();
                MatrixRow {
                    question: *question,
                    cells,
                }
            })
            .collect();
        Self { rows }
    }

    pub fn row(&self, question: QuestionType) -> Option<&MatrixRow> {
        self.rows.iter().find(|r| r.question == question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::CanvasResponses;

    #[test]
    fn test_keywords() {
        assert_eq!(
            keywords("De KLANT staat centraal in alles"),
            vec!["klant", "staat", "centraal", "alles"]
        );
        // Character count, not byte count
        assert_eq!(keywords("één café"), Vec::<String>::new());
        assert_eq!(keywords("cafés"), vec!["cafés"]);
    }

    #[test]
    fn test_three_agree_one_unique() {
        let answers = [
            "partnerschap klanten samenwerking vertrouwen",
            "klanten partnerschap centraal",
            "vertrouwen klanten partnerschap groei",
            "digitale toetsen platform vernieuwen",
        ];
        let cells = consensus_cells(&answers);
        assert_eq!(
            cells,
            vec![
                CellConsensus::Consensus,
                CellConsensus::Consensus,
                CellConsensus::Consensus,
                CellConsensus::Unique,
            ]
        );
    }

    #[test]
    fn test_empty_answers_are_neutral_and_not_counted() {
        // N = 2 answered → threshold 1
        let answers = ["", "klanten partnerschap", "partnerschap klanten", "   "];
        let cells = consensus_cells(&answers);
        assert_eq!(cells[0], CellConsensus::Neutral);
        assert_eq!(cells[1], CellConsensus::Consensus);
        assert_eq!(cells[2], CellConsensus::Consensus);
        assert_eq!(cells[3], CellConsensus::Neutral);
    }

    #[test]
    fn test_neutral_between_unique_and_consensus() {
        // N = 5 → threshold 2; respondent 0 matches only respondent 1
        let answers = [
            "alpha1 bravo2 charlie",
            "alpha1 bravo2 delta4",
            "echo55 foxtrot golf7",
            "hotel8 india9 julie0",
            "kilo11 lima22 mike33",
        ];
        let cells = consensus_cells(&answers);
        assert_eq!(cells[0], CellConsensus::Neutral);
        assert_eq!(cells[2], CellConsensus::Unique);
    }

    #[test]
    fn test_single_shared_keyword_is_not_a_match() {
        let answers = ["klanten centraal", "klanten digitaal"];
        let cells = consensus_cells(&answers);
        assert_eq!(cells, vec![CellConsensus::Unique, CellConsensus::Unique]);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        let answers = ["klanten klanten klanten", "klanten andere"];
        let cells = consensus_cells(&answers);
        assert_eq!(cells, vec![CellConsensus::Unique, CellConsensus::Unique]);
    }

    #[test]
    fn test_matrix_build() {
        let mut a = CanvasResponses::default();
        a.set(QuestionType::Goal1, "klanten partnerschap");
        let mut b = CanvasResponses::default();
        b.set(QuestionType::Goal1, "partnerschap klanten");
        let docs = vec![
            Document::new("s", "a.docx", "anne", "raw", a),
            Document::new("s", "b.docx", "bert", "raw", b),
        ];

        let matrix = ConsensusMatrix::build(&docs, &[QuestionType::Goal1, QuestionType::Goal2]);
        let goal1 = matrix.row(QuestionType::Goal1).unwrap();
        assert_eq!(goal1.count(CellConsensus::Consensus), 2);
        assert_eq!(goal1.cells[0].respondent_id, "anne");

        let goal2 = matrix.row(QuestionType::Goal2).unwrap();
        assert_eq!(goal2.count(CellConsensus::Neutral), 2);
    }
}
