//! Prompt templates for the text-completion collaborator
//!
//! Each template asks for a single JSON object; the matching parser in
//! [`crate::parsing`] locates and reads it leniently.

use crate::analysis::ThemeCluster;
use crate::core::question::QuestionType;

/// Templates for each collaborator call
pub struct PromptTemplate;

impl PromptTemplate {
    /// Extract the eight canvas answers from raw document text
    pub fn parse_canvas(document_text: &str) -> String {
        let fields = QuestionType::ALL
            .iter()
            .map(|q| format!("    \"{}\": \"string\"", q.as_str()))
            .collect::<Vec<_>>()
            .join(",\n");
        let questions = QuestionType::ALL
            .iter()
            .map(|q| format!("- {}", q.label()))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            r#"Je extraheert antwoorden uit een ingevuld canvas.

Het canvas bevat de volgende vragen:
{questions}

Retourneer JSON in dit formaat:
{{
  "respondent_name": "string of null",
  "responses": {{
{fields}
  }}
}}

Gebruik een lege string voor een veld dat niet is ingevuld.

DOCUMENT:
{document_text}"#
        )
    }

    /// Cluster the answers to one question into themes
    pub fn analyze_themes(question: QuestionType, responses: &[(&str, &str)]) -> String {
        let formatted = responses
            .iter()
            .enumerate()
            .map(|(i, (respondent, answer))| format!("Respondent {} ({}):\n{}", i + 1, respondent, answer))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");
        format!(
            r#"Je analyseert kwalitatieve antwoorden en zoekt patronen.

VRAAG: {label}

ANTWOORDEN:
{formatted}

Identificeer thema's, hoe breed ze gedeeld worden, unieke perspectieven en spanningen.

Retourneer JSON in dit formaat:
{{
  "themes": [
    {{
      "id": "theme-1",
      "name": "Korte naam",
      "description": "Uitleg",
      "mentionedBy": ["respondent ids"],
      "consensusLevel": "high|medium|low",
      "exampleQuotes": ["citaten"],
      "relatedResponses": ["respondent ids"]
    }}
  ],
  "tensions": [{{ "themeA": "naam", "themeB": "naam", "description": "waarom" }}],
  "quickWins": ["thema's met hoge consensus"],
  "discussionPoints": ["thema's met spanning of lage consensus"]
}}

consensusLevel is "high" boven 66%, "medium" tussen 33% en 66%, anders "low"."#,
            label = question.label(),
        )
    }

    /// Three candidate wordings for one question
    pub fn generate_proposals(
        question: QuestionType,
        themes: &[ThemeCluster],
        responses: &[(&str, &str)],
    ) -> String {
        let formatted_themes = if themes.is_empty() {
            "Geen thema's beschikbaar".to_string()
        } else {
            themes
                .iter()
                .map(|t| format!("- {}: {} (consensus: {})", t.name, t.description, t.consensus_level))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let formatted_responses = if responses.is_empty() {
            "Geen antwoorden beschikbaar".to_string()
        } else {
            responses
                .iter()
                .enumerate()
                .map(|(i, (_, answer))| format!("Respondent {}: {}", i + 1, answer))
                .collect::<Vec<_>>()
                .join("\n")
        };
        format!(
            r#"Je formuleert gedeelde teksten voor een managementteam.

Formuleer een gedeelde tekst voor: {label}

GEVONDEN THEMA'S:
{formatted_themes}

ORIGINELE ANTWOORDEN:
{formatted_responses}

Maak 3 varianten:
1. beknopt: kernachtig, maximaal 2 zinnen
2. volledig: alle nuances, maximaal 4 zinnen
3. gebalanceerd: tussen 1 en 2 in

Schrijf concreet, toetsbaar en actief.

Retourneer JSON:
{{
  "variants": [
    {{ "id": "variant-1", "type": "beknopt", "text": "...", "emphasizes": "...", "includesThemes": ["..."] }},
    {{ "id": "variant-2", "type": "volledig", "text": "...", "emphasizes": "...", "includesThemes": ["..."] }},
    {{ "id": "variant-3", "type": "gebalanceerd", "text": "...", "emphasizes": "...", "includesThemes": ["..."] }}
  ],
  "recommendation": "gebalanceerd",
  "recommendationRationale": "..."
}}"#,
            label = question.label(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canvas_lists_every_field() {
        let prompt = PromptTemplate::parse_canvas("tekst");
        for q in QuestionType::ALL {
            assert!(prompt.contains(&format!("\"{}\"", q.as_str())));
        }
        assert!(prompt.ends_with("tekst"));
    }

    #[test]
    fn test_analyze_numbers_respondents() {
        let prompt = PromptTemplate::analyze_themes(QuestionType::Stakeholders, &[("anne", "a"), ("bert", "b")]);
        assert!(prompt.contains("Respondent 2 (bert):\nb"));
        assert!(prompt.contains(QuestionType::Stakeholders.label()));
    }

    #[test]
    fn test_proposals_without_input() {
        let prompt = PromptTemplate::generate_proposals(QuestionType::Goal1, &[], &[]);
        assert!(prompt.contains("Geen thema's beschikbaar"));
        assert!(prompt.contains("Geen antwoorden beschikbaar"));
    }
}
