//! Console output formatter for sessions, matrices and votes

use colored::Colorize;
use consent_domain::util::{ellipsize, single_line};
use consent_domain::{
    ApprovedText, CellConsensus, ConsensusLevel, ConsensusMatrix, ConsentStatus, ConsentTally,
    Document, FLOW_ORDER, FinalDocument, FlowState, GoalBoard, Proposal, ScopeCategory, ScopeItem,
    Session, StepStatus, StoredAnalysis, SubStepStatus, Topic,
};

/// Widest matrix cell before an answer is cut
const CELL_CHARS: usize = 28;

/// Formats workflow state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    // ==================== Sessions ====================

    pub fn format_session(session: &Session, state: &FlowState) -> String {
        let mut output = String::new();
        output.push_str(&Self::header(&session.name));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Session:".cyan().bold(), session.id));
        output.push_str(&format!("{} {}\n", "Status:".cyan().bold(), session.status));
        output.push_str(&format!(
            "{} {}\n",
            "Updated:".cyan().bold(),
            session.updated_at.format("%Y-%m-%d %H:%M")
        ));
        output.push_str(&Self::format_flow(state));
        output.push_str(&Self::footer());
        output
    }

    pub fn format_session_list(sessions: &[Session]) -> String {
        if sessions.is_empty() {
            return format!("{}\n", "No sessions yet.".dimmed());
        }
        let mut output = String::new();
        for session in sessions {
            output.push_str(&format!(
                "{}  {:<28} {:<12} {:<20} {}\n",
                session.id.dimmed(),
                ellipsize(&session.name, 28),
                session.status.to_string(),
                session.current_step.to_string(),
                session.updated_at.format("%Y-%m-%d %H:%M")
            ));
        }
        output
    }

    /// One line per step with its status and, for topics, the sub-step status
    pub fn format_flow(state: &FlowState) -> String {
        let mut output = Self::section_header("Flow");
        for step in FLOW_ORDER {
            let status = state.status(step);
            let marker = match status {
                StepStatus::Completed => "✓".green(),
                StepStatus::Active => "•".cyan(),
                StepStatus::Locked => "·".dimmed(),
            };
            let name = if step == state.current_step {
                format!("▶ {}", step.label()).bold().to_string()
            } else {
                format!("  {}", step.label())
            };
            let detail = Topic::for_step(step)
                .map(|topic| Self::sub_step_label(state.sub_step(topic).status))
                .unwrap_or_default();
            output.push_str(&format!("{} {:<32} {}\n", marker, name, detail));
        }
        if state.is_session_complete() {
            output.push_str(&format!("\n{}\n", "All topics approved.".green().bold()));
        }
        output
    }

    fn sub_step_label(status: SubStepStatus) -> String {
        match status {
            SubStepStatus::NotStarted => status.to_string().dimmed().to_string(),
            SubStepStatus::Analyzing => status.to_string().yellow().to_string(),
            SubStepStatus::Voting => status.to_string().cyan().to_string(),
            SubStepStatus::Approved => status.to_string().green().to_string(),
        }
    }

    // ==================== Documents ====================

    pub fn format_documents(documents: &[Document]) -> String {
        if documents.is_empty() {
            return format!("{}\n", "No documents imported.".dimmed());
        }
        let mut output = String::new();
        for doc in documents {
            output.push_str(&format!(
                "{}  {:<16} {:<24} {}/8 answered\n",
                doc.id.dimmed(),
                ellipsize(&doc.respondent_id, 16),
                ellipsize(&doc.filename, 24),
                doc.parsed_responses.answered()
            ));
        }
        output
    }

    pub fn format_document(doc: &Document) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {} ({})\n",
            "Respondent:".cyan().bold(),
            doc.respondent_id,
            doc.filename
        ));
        for (question, answer) in doc.parsed_responses.iter() {
            let answer = if answer.is_empty() {
                "-".dimmed().to_string()
            } else {
                answer.to_string()
            };
            output.push_str(&format!("\n{}\n{}\n", question.label().yellow().bold(), Self::indent(&answer, "  ")));
        }
        output
    }

    // ==================== Matrix and analyses ====================

    /// Answers per question with consensus cells in green, unique ones in yellow
    pub fn format_matrix(matrix: &ConsensusMatrix) -> String {
        let mut output = String::new();
        for row in &matrix.rows {
            output.push_str(&Self::section_header(&format!(
                "{} ({} consensus, {} unique)",
                row.question.label(),
                row.count(CellConsensus::Consensus),
                row.count(CellConsensus::Unique)
            )));
            for cell in &row.cells {
                let answer = ellipsize(&single_line(&cell.answer), CELL_CHARS);
                let answer = match cell.level {
                    CellConsensus::Consensus => answer.green().to_string(),
                    CellConsensus::Unique => answer.yellow().to_string(),
                    CellConsensus::Neutral => answer.dimmed().to_string(),
                };
                output.push_str(&format!("  {:<16} {}\n", ellipsize(&cell.respondent_id, 16), answer));
            }
        }
        output
    }

    pub fn format_analysis(stored: &StoredAnalysis) -> String {
        let analysis = &stored.analysis;
        let mut output = Self::section_header(&format!("Themes: {}", stored.question_type.label()));
        if analysis.is_empty() {
            output.push_str(&format!("{}\n", "No themes found.".dimmed()));
            return output;
        }
        for theme in &analysis.themes {
            let level = match theme.consensus_level {
                ConsensusLevel::High => theme.consensus_level.as_str().green(),
                ConsensusLevel::Medium => theme.consensus_level.as_str().yellow(),
                ConsensusLevel::Low => theme.consensus_level.as_str().red(),
            };
            output.push_str(&format!(
                "\n{} {} [{}, {:.0}%]\n",
                theme.name.yellow().bold(),
                format!("({})", theme.id).dimmed(),
                level,
                theme.ai_confidence * 100.0
            ));
            if !theme.description.is_empty() {
                output.push_str(&format!("{}\n", Self::indent(&theme.description, "  ")));
            }
            if !theme.mentioned_by.is_empty() {
                output.push_str(&format!("  {} {}\n", "Mentioned by:".dimmed(), theme.mentioned_by.join(", ")));
            }
        }
        Self::push_list(&mut output, "Tensions:", analysis.tensions.iter().map(|t| {
            format!("{} ↔ {}: {}", t.theme_a, t.theme_b, t.description)
        }));
        Self::push_list(&mut output, "Quick wins:", analysis.quick_wins.iter().cloned());
        Self::push_list(&mut output, "Discussion points:", analysis.discussion_points.iter().cloned());
        output
    }

    // ==================== Proposals and votes ====================

    pub fn format_proposal(proposal: &Proposal) -> String {
        let mut output = Self::section_header(&format!(
            "{} ({})",
            proposal.question_type.label(),
            proposal.status
        ));
        output.push_str(&format!("{} {}\n", "Proposal:".dimmed(), proposal.id));
        for variant in &proposal.variants {
            let recommended = proposal.recommendation.as_deref() == Some(variant.style.as_str());
            let approved = proposal.approved_variant_id.as_deref() == Some(variant.id.as_str());
            let mut title = format!("{} [{}]", variant.id, variant.style).yellow().bold().to_string();
            if recommended {
                title.push_str(&format!(" {}", "aanbevolen".cyan()));
            }
            if approved {
                title.push_str(&format!(" {}", "✓ approved".green().bold()));
            }
            output.push_str(&format!("\n{}\n{}\n", title, Self::indent(&variant.text, "  ")));
        }
        if let Some(rationale) = &proposal.recommendation_rationale {
            output.push_str(&format!("\n{} {}\n", "Why:".dimmed(), rationale));
        }
        output
    }

    /// One line per variant: marks, counts and the consent banner
    pub fn format_tallies(proposal: &Proposal, tallies: &[(String, ConsentTally)]) -> String {
        let mut output = Self::section_header(&format!("Votes: {}", proposal.question_type.label()));
        for (variant_id, tally) in tallies {
            output.push_str(&format!(
                "{:<12} {} {} agree, {} disagree, {} abstain  {}\n",
                variant_id,
                tally.summary(),
                tally.agree,
                tally.disagree,
                tally.abstain,
                Self::consent_banner(tally.status())
            ));
        }
        output
    }

    pub fn consent_banner(status: ConsentStatus) -> String {
        let text = status.to_string();
        match status {
            ConsentStatus::Approved => text.green().bold().to_string(),
            ConsentStatus::Objections => text.red().bold().to_string(),
            ConsentStatus::AllVoted => text.yellow().to_string(),
            ConsentStatus::Pending => text.dimmed().to_string(),
        }
    }

    pub fn format_approved_text(text: &ApprovedText) -> String {
        format!(
            "{} {}\n{}\n",
            "Approved:".green().bold(),
            text.question_type.label(),
            Self::indent(&text.text, "  ")
        )
    }

    // ==================== Goals and scope ====================

    pub fn format_goal_board(board: &GoalBoard) -> String {
        let mut output = Self::section_header("Goal clusters");
        for cluster in board.sorted_clusters() {
            let rank = board
                .ranking
                .rank_of(&cluster.id)
                .map(|r| format!("#{}", r).cyan().bold().to_string())
                .unwrap_or_else(|| "  ".to_string());
            output.push_str(&format!(
                "{} {} {} {} pts, {} goals\n",
                rank,
                cluster.name.yellow().bold(),
                format!("({})", cluster.id).dimmed(),
                cluster.votes,
                cluster.goals.len()
            ));
        }
        if !board.ballots.is_empty() {
            let submitted = board.ballots.iter().filter(|b| b.is_submitted()).count();
            output.push_str(&format!(
                "\n{} {}/{} ballots submitted\n",
                "Dots:".dimmed(),
                submitted,
                board.ballots.len()
            ));
        }
        output.push_str(&Self::section_header(&format!(
            "Ranking ({}/{})",
            board.ranking.len(),
            board.ranking.capacity()
        )));
        if board.ranking.is_empty() {
            output.push_str(&format!("{}\n", "Nothing ranked yet.".dimmed()));
        }
        for (rank, id) in board.ranking.ranked() {
            let text = board.formulation(id).unwrap_or_else(|| id.to_string());
            output.push_str(&format!("{}. {}\n", rank, text));
        }
        output
    }

    pub fn format_scope_items(items: &[ScopeItem]) -> String {
        if items.is_empty() {
            return format!("{}\n", "No scope items.".dimmed());
        }
        let mut output = String::new();
        for category in [ScopeCategory::Unclear, ScopeCategory::OutOfScope, ScopeCategory::InScope] {
            let in_category: Vec<&ScopeItem> = items.iter().filter(|i| i.category == category).collect();
            if in_category.is_empty() {
                continue;
            }
            output.push_str(&Self::section_header(category.label()));
            for item in in_category {
                output.push_str(&format!("  {} {}\n", item.id.dimmed(), item.text));
            }
        }
        output
    }

    pub fn format_final_document(document: &FinalDocument) -> String {
        let mut output = Self::header("Visiedocument");
        output.push('\n');
        let vision = &document.vision;
        for (title, text) in [
            ("Huidige situatie", &vision.current_situation),
            ("Gewenste situatie", &vision.desired_situation),
            ("Beweging", &vision.change_direction),
            ("Stakeholders", &vision.stakeholders),
        ] {
            output.push_str(&format!("\n{}\n{}\n", title.cyan().bold(), Self::indent(text, "  ")));
        }
        Self::push_list(&mut output, "Doelen:", document.goals.iter().map(|g| format!("{}. {}", g.rank, g.text)));
        Self::push_list(&mut output, "Buiten scope:", document.scope.out_of_scope.iter().cloned());
        output.push_str(&Self::footer());
        output
    }

    // ==================== Helpers ====================

    fn push_list(output: &mut String, title: &str, items: impl Iterator<Item = String>) {
        let items: Vec<String> = items.collect();
        if items.is_empty() {
            return;
        }
        output.push_str(&format!("\n{}\n", title.cyan().bold()));
        for item in items {
            output.push_str(&format!("  * {}\n", item));
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_domain::{CanvasResponses, ProposalSet, QuestionType, VoteValue};

    fn document(respondent: &str, answer: &str) -> Document {
        let mut responses = CanvasResponses::default();
        responses.set(QuestionType::CurrentSituation, answer);
        Document::new("s1", format!("{}.txt", respondent), respondent, answer, responses)
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }

    #[test]
    fn test_matrix_shows_counts_and_cuts_long_answers() {
        let long = "Klantgerichtheid en samenwerking staan centraal in alles wat we dagelijks doen";
        let docs = vec![
            document("anne", long),
            document("bram", "Klantgerichtheid en samenwerking zijn belangrijk"),
            document("cees", "Budget"),
        ];
        let matrix = ConsensusMatrix::build(&docs, &[QuestionType::CurrentSituation]);
        let output = ConsoleFormatter::format_matrix(&matrix);

        assert!(output.contains("2 consensus, 1 unique"));
        assert!(output.contains('…'));
        assert!(!output.contains("dagelijks"));
    }

    #[test]
    fn test_tallies_show_banner_per_variant() {
        let proposal = Proposal::new("s1", QuestionType::Stakeholders, ProposalSet::placeholder());
        let tallies = vec![
            (
                "variant-1".to_string(),
                ConsentTally::from_values(2, &[VoteValue::Agree, VoteValue::Agree]),
            ),
            (
                "variant-2".to_string(),
                ConsentTally::from_values(2, &[VoteValue::Disagree]),
            ),
        ];
        let output = ConsoleFormatter::format_tallies(&proposal, &tallies);

        assert!(output.contains("[●●]"));
        assert!(output.contains("Consent reached"));
        assert!(output.contains("[✕·]"));
        assert!(output.contains("Objections raised"));
    }

    #[test]
    fn test_flow_marks_current_step() {
        let state = FlowState::initial();
        let output = ConsoleFormatter::format_flow(&state);
        assert!(output.contains(&format!("▶ {}", state.current_step.label())));
        assert!(!output.contains("All topics approved."));
    }

    #[test]
    fn test_empty_lists() {
        assert!(ConsoleFormatter::format_session_list(&[]).contains("No sessions yet."));
        assert!(ConsoleFormatter::format_documents(&[]).contains("No documents imported."));
        assert!(ConsoleFormatter::format_scope_items(&[]).contains("No scope items."));
    }

    #[test]
    fn test_proposal_marks_recommendation() {
        let proposal = Proposal::new("s1", QuestionType::Stakeholders, ProposalSet::placeholder());
        let output = ConsoleFormatter::format_proposal(&proposal);
        assert!(output.contains("Gebalanceerde versie."));
        assert!(output.contains("aanbevolen"));
    }
}
