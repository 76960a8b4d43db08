//! Human-readable Markdown export

use consent_application::ports::exporter::{DocumentExporter, ExportError};
use consent_domain::{FinalDocument, QuestionType};
use std::fmt::Write;

pub struct MarkdownExporter;

fn section(out: &mut String, question: QuestionType, text: &str) {
    let _ = writeln!(out, "### {}\n", question.label());
    if text.is_empty() {
        out.push_str("_Nog niet vastgesteld._\n\n");
    } else {
        let _ = writeln!(out, "{}\n", text);
    }
}

impl MarkdownExporter {
    pub fn render(&self, document: &FinalDocument) -> String {
        let mut out = String::from("# Visiedocument\n\n");

        out.push_str("## Visie\n\n");
        let vision = &document.vision;
        section(&mut out, QuestionType::CurrentSituation, &vision.current_situation);
        section(&mut out, QuestionType::DesiredSituation, &vision.desired_situation);
        section(&mut out, QuestionType::ChangeDirection, &vision.change_direction);
        section(&mut out, QuestionType::Stakeholders, &vision.stakeholders);

        out.push_str("## Doelen\n\n");
        if document.goals.is_empty() {
            out.push_str("_Nog geen doelen vastgesteld._\n\n");
        }
        for goal in &document.goals {
            let _ = writeln!(out, "{}. {}", goal.rank, goal.text);
        }
        if !document.goals.is_empty() {
            out.push('\n');
        }

        out.push_str("## Buiten scope\n\n");
        if document.scope.out_of_scope.is_empty() {
            out.push_str("_Niets buiten scope geplaatst._\n\n");
        }
        for item in &document.scope.out_of_scope {
            let _ = writeln!(out, "- {}", item);
        }
        if !document.scope.out_of_scope.is_empty() {
            out.push('\n');
        }

        let stamp = document.exported_at.unwrap_or(document.generated_at);
        let _ = writeln!(out, "---\n_Gegenereerd op {}_", stamp.format("%d-%m-%Y %H:%M"));
        out
    }
}

impl DocumentExporter for MarkdownExporter {
    fn format(&self) -> &'static str {
        "markdown"
    }

    fn extension(&self) -> &'static str {
        "md"
    }

    fn export(&self, document: &FinalDocument) -> Result<Vec<u8>, ExportError> {
        Ok(self.render(document).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_domain::ApprovedText;

    #[test]
    fn test_render_sections() {
        let texts = vec![
            ApprovedText::new("s", QuestionType::CurrentSituation, "Silo's", "p", "v"),
            ApprovedText::new("s", QuestionType::Goal1, "Klant centraal", "cluster", "c1"),
            ApprovedText::new("s", QuestionType::OutOfScope, "• HR", "scope", "scope-final"),
        ];
        let markdown = MarkdownExporter.render(&FinalDocument::from_approved_texts("s", &texts));

        assert!(markdown.starts_with("# Visiedocument"));
        assert!(markdown.contains("Silo's"));
        assert!(markdown.contains("1. Klant centraal"));
        assert!(markdown.contains("- HR"));
        assert!(markdown.contains("_Nog niet vastgesteld._"));
    }

    #[test]
    fn test_markdown_is_not_reimportable() {
        assert!(matches!(
            MarkdownExporter.import(b"# Visiedocument"),
            Err(ExportError::UnknownFormat(_))
        ));
    }
}
