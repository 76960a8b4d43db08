//! Lenient parsing of collaborator output
//!
//! The completion collaborator answers in free text that should contain one
//! JSON object. These functions never fail: malformed output degrades to a
//! typed fallback so the workflow stays navigable.
//!
//! | Function | Fallback |
//! |----------|----------|
//! | [`parse_analysis`] | empty [`Analysis`] |
//! | [`parse_proposal_set`] | [`ProposalSet::placeholder`] |
//! | [`parse_canvas_fields`] | `None` (caller keeps the document with empty answers) |

use crate::analysis::{Analysis, ConsensusLevel, Tension, ThemeCluster};
use crate::core::question::QuestionType;
use crate::document::CanvasResponses;
use crate::proposal::{ProposalSet, ProposalVariant, VariantStyle};
use serde_json::Value;

/// The span from the first `{` to the last `}`, if any
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_object(text: &str) -> Option<Value> {
    let json = extract_json_object(text)?;
    serde_json::from_str::<Value>(json).ok().filter(Value::is_object)
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse a theme analysis. Themes without a name are skipped.
pub fn parse_analysis(text: &str, question: QuestionType) -> Analysis {
    let Some(root) = parse_object(text) else {
        return Analysis::default();
    };

    let themes: Vec<ThemeCluster> = root
        .get("themes")
        .and_then(Value::as_array)
        .map(|themes| {
            themes
                .iter()
                .enumerate()
                .filter_map(|(i, theme)| parse_theme(theme, i, question))
                .collect()
        })
        .unwrap_or_default();

    let tensions: Vec<Tension> = root
        .get("tensions")
        .and_then(Value::as_array)
        .map(|tensions| {
            tensions
                .iter()
                .filter_map(|t| {
                    Some(Tension {
                        theme_a: string_field(t, "themeA")?,
                        theme_b: string_field(t, "themeB")?,
                        description: string_field(t, "description").unwrap_or_default(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Analysis {
        themes,
        tensions,
        quick_wins: string_list(&root, "quickWins"),
        discussion_points: string_list(&root, "discussionPoints"),
    }
}

fn parse_theme(theme: &Value, index: usize, question: QuestionType) -> Option<ThemeCluster> {
    let name = string_field(theme, "name")?;
    let consensus_level = theme
        .get("consensusLevel")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<ConsensusLevel>().ok())
        .unwrap_or(ConsensusLevel::Low);
    let ai_confidence = theme
        .get("aiConfidence")
        .and_then(Value::as_f64)
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or_else(|| consensus_level.default_confidence());

    Some(ThemeCluster {
        id: string_field(theme, "id").unwrap_or_else(|| format!("theme-{}", index + 1)),
        name,
        description: string_field(theme, "description").unwrap_or_default(),
        question_type: question,
        related_responses: string_list(theme, "relatedResponses"),
        mentioned_by: string_list(theme, "mentionedBy"),
        consensus_level,
        ai_confidence,
        example_quotes: string_list(theme, "exampleQuotes"),
    })
}

/// Parse generated proposal variants.
///
/// A variant without text is skipped; a missing or unknown `type` falls back
/// to the style of its position. No usable variant yields the placeholder set.
pub fn parse_proposal_set(text: &str) -> ProposalSet {
    let Some(root) = parse_object(text) else {
        return ProposalSet::placeholder();
    };

    let variants: Vec<ProposalVariant> = root
        .get("variants")
        .and_then(Value::as_array)
        .map(|variants| {
            variants
                .iter()
                .enumerate()
                .filter_map(|(i, v)| {
                    let text = string_field(v, "text")?;
                    let style = v
                        .get("type")
                        .or_else(|| v.get("style"))
                        .and_then(Value::as_str)
                        .and_then(|s| s.parse::<VariantStyle>().ok())
                        .or_else(|| VariantStyle::ALL.get(i).copied())?;
                    Some(ProposalVariant {
                        id: string_field(v, "id").unwrap_or_else(|| format!("variant-{}", i + 1)),
                        style,
                        text,
                        emphasizes: string_field(v, "emphasizes").unwrap_or_default(),
                        includes_themes: string_list(v, "includesThemes"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if variants.is_empty() {
        return ProposalSet::placeholder();
    }

    ProposalSet {
        variants,
        recommendation: string_field(&root, "recommendation"),
        recommendation_rationale: string_field(&root, "recommendationRationale"),
    }
}

/// Fields extracted from one canvas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanvasExtraction {
    pub respondent_name: Option<String>,
    pub responses: CanvasResponses,
}

/// Parse extracted canvas fields. Unknown question keys are ignored.
pub fn parse_canvas_fields(text: &str) -> Option<CanvasExtraction> {
    let root = parse_object(text)?;
    let responses: CanvasResponses = root
        .get("responses")
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .filter_map(|(key, value)| {
                    let question = key.parse::<QuestionType>().ok()?;
                    let answer = value.as_str().unwrap_or("").trim().to_string();
                    Some((question, answer))
                })
                .collect()
        })
        .unwrap_or_default();

    Some(CanvasExtraction {
        respondent_name: string_field(&root, "respondent_name"),
        responses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_object() {
        assert_eq!(extract_json_object("Hier: {\"a\": {\"b\": 1}} klaar"), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(extract_json_object("geen json"), None);
        assert_eq!(extract_json_object("} verkeerd {"), None);
    }

    #[test]
    fn test_analysis_fallback_on_garbage() {
        let analysis = parse_analysis("Sorry, dat lukt niet.", QuestionType::Goal1);
        assert_eq!(analysis, Analysis::default());
        let analysis = parse_analysis("{ niet: geldig }", QuestionType::Goal1);
        assert!(analysis.is_empty());
    }

    #[test]
    fn test_analysis_parses_and_skips_invalid_themes() {
        let raw = r#"Resultaat:
```json
{
  "themes": [
    {"id": "theme-1", "name": "Partnerschap", "description": "Samen met klanten",
     "mentionedBy": ["anne", "bert"], "consensusLevel": "high",
     "exampleQuotes": ["samen optrekken"]},
    {"description": "zonder naam"},
    {"name": "Data", "consensusLevel": "onbekend", "aiConfidence": 4.2}
  ],
  "tensions": [{"themeA": "Partnerschap", "themeB": "Data", "description": "focus"}, {"themeA": "x"}],
  "quickWins": ["Partnerschap"],
  "discussionPoints": ["Data", 7]
}
```"#;
        let analysis = parse_analysis(raw, QuestionType::DesiredSituation);
        assert_eq!(analysis.themes.len(), 2);

        let first = &analysis.themes[0];
        assert_eq!(first.consensus_level, ConsensusLevel::High);
        assert_eq!(first.ai_confidence, 0.9);
        assert_eq!(first.mentioned_by, vec!["anne", "bert"]);
        assert_eq!(first.question_type, QuestionType::DesiredSituation);

        let second = &analysis.themes[1];
        assert_eq!(second.id, "theme-3");
        assert_eq!(second.consensus_level, ConsensusLevel::Low);
        assert_eq!(second.ai_confidence, 1.0);

        assert_eq!(analysis.tensions.len(), 1);
        assert_eq!(analysis.quick_wins, vec!["Partnerschap"]);
        assert_eq!(analysis.discussion_points, vec!["Data"]);
    }

    #[test]
    fn test_proposal_fallback() {
        assert_eq!(parse_proposal_set("timeout"), ProposalSet::placeholder());
        assert_eq!(parse_proposal_set(r#"{"variants": []}"#), ProposalSet::placeholder());
    }

    #[test]
    fn test_proposal_parse() {
        let raw = r#"{"variants": [
            {"id": "v-a", "type": "beknopt", "text": "Kort.", "emphasizes": "Kern"},
            {"text": "Lang en volledig."},
            {"id": "v-c", "type": "gebalanceerd"}
        ], "recommendation": "beknopt", "recommendationRationale": "Helder"}"#;
        let set = parse_proposal_set(raw);
        assert_eq!(set.variants.len(), 2);
        assert_eq!(set.variants[0].id, "v-a");
        assert_eq!(set.variants[1].id, "variant-2");
        assert_eq!(set.variants[1].style, VariantStyle::Volledig);
        assert_eq!(set.recommendation.as_deref(), Some("beknopt"));
        assert_eq!(set.recommendation_rationale.as_deref(), Some("Helder"));
    }

    #[test]
    fn test_canvas_fields() {
        let raw = r#"{"respondent_name": "Roel", "responses": {
            "current_situation": " Versnipperd ", "goal_1": "Klant centraal",
            "bonus": "genegeerd", "goal_2": null}}"#;
        let extraction = parse_canvas_fields(raw).unwrap();
        assert_eq!(extraction.respondent_name.as_deref(), Some("Roel"));
        assert_eq!(extraction.responses.get(QuestionType::CurrentSituation), "Versnipperd");
        assert_eq!(extraction.responses.get(QuestionType::Goal1), "Klant centraal");
        assert_eq!(extraction.responses.get(QuestionType::Goal2), "");
        assert_eq!(extraction.responses.answered(), 2);
    }

    #[test]
    fn test_canvas_null_name_and_garbage() {
        let extraction = parse_canvas_fields(r#"{"respondent_name": null}"#).unwrap();
        assert!(extraction.respondent_name.is_none());
        assert!(extraction.responses.is_empty());
        assert!(parse_canvas_fields("niets").is_none());
    }
}
