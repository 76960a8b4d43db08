//! Command dispatch
//!
//! Resolves the session a command works on and calls the facade or a use
//! case for it. Output goes through the console formatter.

use anyhow::{Context, Result, bail};
use consent_application::{
    AnalyzeThemesUseCase, CompletionGateway, DocumentTextExtractor, ExportFinalDocumentUseCase,
    GenerateProposalsUseCase, ImportDocumentInput, ImportDocumentUseCase, ProgressNotifier,
    SessionFacade, ThemeEdit,
};
use consent_domain::{ConsensusMatrix, QuestionType, SessionHandle, VoteValue};
use consent_presentation::{
    Command, ConsoleFormatter, DocCommand, GoalsCommand, ScopeCommand, SessionCommand, StepCommand,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub struct App {
    facade: SessionFacade,
    analyze: AnalyzeThemesUseCase,
    generate: GenerateProposalsUseCase,
    import: ImportDocumentUseCase,
    export: ExportFinalDocumentUseCase,
    progress: Box<dyn ProgressNotifier>,
}

impl App {
    pub fn new(
        facade: SessionFacade,
        gateway: Arc<dyn CompletionGateway>,
        export: ExportFinalDocumentUseCase,
        progress: Box<dyn ProgressNotifier>,
    ) -> Self {
        Self {
            analyze: AnalyzeThemesUseCase::new(gateway.clone(), facade.clone()),
            generate: GenerateProposalsUseCase::new(gateway.clone(), facade.clone()),
            import: ImportDocumentUseCase::new(gateway, facade.clone()),
            facade,
            export,
            progress,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn DocumentTextExtractor>) -> Self {
        self.import = self.import.with_extractor(extractor);
        self
    }

    pub async fn run(&self, command: Option<Command>, session: Option<&str>) -> Result<()> {
        let Some(command) = command else {
            return self.resume_prompt();
        };

        match command {
            Command::Session(command) => self.session_command(command, session),
            Command::Doc(command) => self.doc_command(command, session).await,
            Command::Step(command) => self.step_command(command, session),
            Command::Goals(command) => self.goals_command(command, session).await,
            Command::Scope(command) => self.scope_command(command, session),
            Command::Matrix { questions } => self.matrix(&self.handle(session)?, questions),
            Command::Analyze { questions } => self.analyze_questions(&self.handle(session)?, questions).await,
            Command::Theme {
                question,
                theme,
                rename,
                describe,
                delete,
            } => self.edit_theme(&self.handle(session)?, question, &theme, rename, describe, delete),
            Command::Propose { question, theme } => {
                let proposal = self
                    .generate
                    .execute_with_progress(&self.handle(session)?, question, theme.as_deref(), self.progress.as_ref())
                    .await?;
                print!("{}", ConsoleFormatter::format_proposal(&proposal));
                Ok(())
            }
            Command::Proposals { question } => self.list_proposals(&self.handle(session)?, question),
            Command::EditVariant {
                proposal,
                variant,
                text,
            } => {
                let proposal = self
                    .facade
                    .edit_variant_text(&self.handle(session)?, &proposal, &variant, &text)?;
                print!("{}", ConsoleFormatter::format_proposal(&proposal));
                Ok(())
            }
            Command::Vote {
                proposal,
                variant,
                respondent,
                value,
                comment,
            } => self.vote(&self.handle(session)?, &proposal, &variant, &respondent, value, comment),
            Command::Tally { proposal } => self.tally(&self.handle(session)?, &proposal),
            Command::Approve {
                proposal,
                variant,
                force,
            } => {
                let approved = self
                    .facade
                    .approve_variant(&self.handle(session)?, &proposal, &variant, force)?;
                print!("{}", ConsoleFormatter::format_approved_text(&approved));
                Ok(())
            }
            Command::Export { format, output } => self.export_document(&self.handle(session)?, &format, output),
            Command::Restore { path, format } => self.restore(&self.handle(session)?, &path, format),
            Command::Dump { output } => self.dump(&self.handle(session)?, output),
        }
    }

    /// The `--session` id, or the session that would be resumed
    fn handle(&self, session: Option<&str>) -> Result<SessionHandle> {
        if let Some(id) = session {
            return Ok(self.facade.load_session(id)?.session.handle());
        }
        match self.facade.check_for_existing_session()? {
            Some(session) => Ok(session.handle()),
            None => bail!("No open session. Start one with `consent session new <name>`"),
        }
    }

    fn resume_prompt(&self) -> Result<()> {
        match self.facade.check_for_existing_session()? {
            Some(session) => {
                let loaded = self.facade.load_session(&session.id)?;
                print!("{}", ConsoleFormatter::format_session(&loaded.session, &loaded.flow_state));
            }
            None => println!("No session to resume. Start one with `consent session new <name>`."),
        }
        Ok(())
    }

    // ==================== Sessions ====================

    fn session_command(&self, command: SessionCommand, session: Option<&str>) -> Result<()> {
        match command {
            SessionCommand::New { name } => {
                let loaded = self.facade.create_session(&name)?;
                print!("{}", ConsoleFormatter::format_session(&loaded.session, &loaded.flow_state));
            }
            SessionCommand::List => {
                print!("{}", ConsoleFormatter::format_session_list(&self.facade.list_sessions()?));
            }
            SessionCommand::Show => {
                let handle = self.handle(session)?;
                let loaded = self.facade.load_session(handle.id())?;
                print!("{}", ConsoleFormatter::format_session(&loaded.session, &loaded.flow_state));
            }
            SessionCommand::Resume => self.resume_prompt()?,
            SessionCommand::Rename { name } => {
                let handle = self.handle(session)?;
                let renamed = self.facade.rename_session(&handle, &name)?;
                println!("Renamed session {} to '{}'", renamed.id, renamed.name);
            }
            SessionCommand::Close => {
                let handle = self.handle(session)?;
                let closed = self.facade.close_session(&handle)?;
                println!("Session '{}' is {}", closed.name, closed.status);
            }
            SessionCommand::Delete { yes } => {
                let handle = self.handle(session)?;
                if !yes {
                    bail!("Deleting session {} removes all of its data; pass --yes to confirm", handle);
                }
                let removed = self.facade.delete_session(&handle)?;
                println!("Deleted session {} ({} records)", handle, removed);
            }
        }
        Ok(())
    }

    // ==================== Documents ====================

    async fn doc_command(&self, command: DocCommand, session: Option<&str>) -> Result<()> {
        let handle = self.handle(session)?;
        match command {
            DocCommand::Import { paths, respondent } => {
                if respondent.is_some() && paths.len() > 1 {
                    bail!("--respondent can only be used with a single file");
                }
                for path in &paths {
                    self.import_document(&handle, path, respondent.as_deref()).await?;
                }
            }
            DocCommand::List => {
                print!("{}", ConsoleFormatter::format_documents(&self.facade.documents(&handle)?));
            }
            DocCommand::Show { document } => {
                print!("{}", ConsoleFormatter::format_document(&self.facade.document(&handle, &document)?));
            }
            DocCommand::Edit {
                document,
                question,
                answer,
            } => {
                let doc = self
                    .facade
                    .update_document_response(&handle, &document, question, &answer)?;
                println!("Updated {} of {}", question.label(), doc.respondent_id);
            }
            DocCommand::Remove { document } => {
                let doc = self.facade.remove_document(&handle, &document)?;
                println!("Removed {} ({})", doc.filename, doc.respondent_id);
            }
        }
        Ok(())
    }

    async fn import_document(&self, handle: &SessionHandle, path: &Path, respondent: Option<&str>) -> Result<()> {
        let bytes = std::fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut input = ImportDocumentInput::new(filename, bytes);
        if let Some(respondent) = respondent {
            input = input.with_respondent(respondent);
        }
        let doc = self
            .import
            .execute_with_progress(handle, input, self.progress.as_ref())
            .await
            .with_context(|| format!("Import of {} failed", path.display()))?;
        println!(
            "Imported {} as {} ({}/8 answered)",
            doc.filename,
            doc.respondent_id,
            doc.parsed_responses.answered()
        );
        Ok(())
    }

    // ==================== Flow ====================

    fn step_command(&self, command: StepCommand, session: Option<&str>) -> Result<()> {
        let handle = self.handle(session)?;
        let state = match command {
            StepCommand::Status => self.facade.flow_state(&handle)?,
            StepCommand::Next => self.facade.advance(&handle)?,
            StepCommand::Goto { step } => self.facade.set_current_step(&handle, step)?,
            StepCommand::Complete { step } => {
                let step = match step {
                    Some(step) => step,
                    None => self.facade.flow_state(&handle)?.current_step,
                };
                self.facade.complete_step(&handle, step)?
            }
            StepCommand::Unlock { step } => self.facade.unlock_step(&handle, step)?,
        };
        print!("{}", ConsoleFormatter::format_flow(&state));
        Ok(())
    }

    // ==================== Topics: analysis, proposals, votes ====================

    fn matrix(&self, handle: &SessionHandle, questions: Vec<QuestionType>) -> Result<()> {
        let questions = if questions.is_empty() {
            QuestionType::ALL.to_vec()
        } else {
            questions
        };
        let documents = self.facade.documents(handle)?;
        let matrix = ConsensusMatrix::build(&documents, &questions);
        print!("{}", ConsoleFormatter::format_matrix(&matrix));
        Ok(())
    }

    /// Analyze the named questions, or those of the current step
    async fn analyze_questions(&self, handle: &SessionHandle, questions: Vec<QuestionType>) -> Result<()> {
        let questions = if questions.is_empty() {
            let step = self.facade.flow_state(handle)?.current_step;
            if step.question_types().is_empty() {
                bail!("Step {} has no questions to analyze; name one explicitly", step);
            }
            step.question_types().to_vec()
        } else {
            questions
        };
        let analyses = self
            .analyze
            .execute_many(handle, &questions, self.progress.as_ref())
            .await?;
        for stored in &analyses {
            print!("{}", ConsoleFormatter::format_analysis(stored));
        }
        Ok(())
    }

    fn edit_theme(
        &self,
        handle: &SessionHandle,
        question: QuestionType,
        theme: &str,
        rename: Option<String>,
        describe: Option<String>,
        delete: bool,
    ) -> Result<()> {
        let edit = match (rename, describe, delete) {
            (Some(name), _, _) => ThemeEdit::Rename(name),
            (None, Some(text), _) => ThemeEdit::Describe(text),
            (None, None, true) => ThemeEdit::Delete,
            (None, None, false) => bail!("Pass --rename, --describe or --delete"),
        };
        let stored = self.facade.edit_theme(handle, question, theme, edit)?;
        print!("{}", ConsoleFormatter::format_analysis(&stored));
        Ok(())
    }

    fn list_proposals(&self, handle: &SessionHandle, question: Option<QuestionType>) -> Result<()> {
        let proposals = match question {
            Some(question) => self.facade.proposals_for(handle, question)?,
            None => self.facade.proposals(handle)?,
        };
        if proposals.is_empty() {
            println!("No proposals yet.");
        }
        for proposal in &proposals {
            print!("{}", ConsoleFormatter::format_proposal(proposal));
        }
        Ok(())
    }

    fn vote(
        &self,
        handle: &SessionHandle,
        proposal: &str,
        variant: &str,
        respondent: &str,
        value: VoteValue,
        comment: Option<String>,
    ) -> Result<()> {
        let vote = self
            .facade
            .cast_vote(handle, proposal, variant, respondent, value, comment)?;
        let tally = self.facade.consent_tally(handle, proposal, variant)?;
        println!(
            "{} voted {} on {}  {} {}",
            vote.respondent_id,
            vote.value,
            vote.variant_id,
            tally.summary(),
            ConsoleFormatter::consent_banner(tally.status())
        );
        Ok(())
    }

    fn tally(&self, handle: &SessionHandle, proposal_id: &str) -> Result<()> {
        let proposal = self.facade.proposal(handle, proposal_id)?;
        let mut tallies = Vec::with_capacity(proposal.variants.len());
        for variant in &proposal.variants {
            let tally = self.facade.consent_tally(handle, &proposal.id, &variant.id)?;
            tallies.push((variant.id.clone(), tally));
        }
        print!("{}", ConsoleFormatter::format_tallies(&proposal, &tallies));
        Ok(())
    }

    // ==================== Export ====================

    fn export_document(&self, handle: &SessionHandle, format: &str, output: Option<PathBuf>) -> Result<()> {
        let exported = self.export.execute(handle, format)?;
        let path = output.unwrap_or_else(|| PathBuf::from(&exported.filename));
        std::fs::write(&path, &exported.bytes).with_context(|| format!("Cannot write {}", path.display()))?;
        print!("{}", ConsoleFormatter::format_final_document(&exported.document));
        println!("Wrote {} ({})", path.display(), exported.format);
        Ok(())
    }

    fn restore(&self, handle: &SessionHandle, path: &Path, format: Option<String>) -> Result<()> {
        let format = match format {
            Some(format) => format,
            None => format_for_path(path)?,
        };
        let bytes = std::fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
        let document = self.export.import(handle, &format, &bytes)?;
        print!("{}", ConsoleFormatter::format_final_document(&document));
        Ok(())
    }

    fn dump(&self, handle: &SessionHandle, output: Option<PathBuf>) -> Result<()> {
        let bundle = self.facade.export_session_data(handle)?;
        let json = serde_json::to_string_pretty(&bundle)?;
        match output {
            Some(path) => {
                std::fs::write(&path, json).with_context(|| format!("Cannot write {}", path.display()))?;
                info!("Session {} dumped to {}", handle, path.display());
            }
            None => println!("{}", json),
        }
        Ok(())
    }

    // ==================== Goals ====================

    async fn goals_command(&self, command: GoalsCommand, session: Option<&str>) -> Result<()> {
        let handle = self.handle(session)?;
        match command {
            GoalsCommand::Cluster => {
                let board = self.analyze.cluster_goals(&handle, self.progress.as_ref()).await?;
                print!("{}", ConsoleFormatter::format_goal_board(&board));
            }
            GoalsCommand::Board => {
                print!("{}", ConsoleFormatter::format_goal_board(&self.facade.goal_board(&handle)?));
            }
            GoalsCommand::Select { clusters } => {
                let board = self.facade.select_goal_clusters(&handle, &clusters)?;
                print!("{}", ConsoleFormatter::format_goal_board(&board));
            }
            GoalsCommand::Rename { cluster, name } => {
                self.facade.rename_goal_cluster(&handle, &cluster, &name)?;
                println!("Renamed {} to '{}'", cluster, name);
            }
            GoalsCommand::Dot { voter, cluster, remove } => {
                let changed = if remove {
                    self.facade.remove_dot(&handle, &voter, &cluster)?
                } else {
                    self.facade.add_dot(&handle, &voter, &cluster)?
                };
                if !changed {
                    println!("No change: budget used up, no point to take back or ballot already submitted");
                }
            }
            GoalsCommand::Submit { voter } => {
                let board = self.facade.submit_ballot(&handle, &voter)?;
                print!("{}", ConsoleFormatter::format_goal_board(&board));
            }
            GoalsCommand::Rank(command) => {
                if !self.facade.rank_goal(&handle, command.into())? {
                    println!("Ranking unchanged");
                }
                print!("{}", ConsoleFormatter::format_goal_board(&self.facade.goal_board(&handle)?));
            }
            GoalsCommand::Formulate { cluster, text } => {
                self.facade.set_goal_formulation(&handle, &cluster, &text)?;
                println!("Wording of {} set", cluster);
            }
            GoalsCommand::Approve => {
                for approved in self.facade.approve_goal_ranking(&handle)? {
                    print!("{}", ConsoleFormatter::format_approved_text(&approved));
                }
            }
        }
        Ok(())
    }

    // ==================== Scope ====================

    fn scope_command(&self, command: ScopeCommand, session: Option<&str>) -> Result<()> {
        let handle = self.handle(session)?;
        match command {
            ScopeCommand::Collect => {
                print!("{}", ConsoleFormatter::format_scope_items(&self.facade.collect_scope(&handle)?));
            }
            ScopeCommand::List => {
                print!("{}", ConsoleFormatter::format_scope_items(&self.facade.scope_items(&handle)?));
            }
            ScopeCommand::Set { item, category } => {
                self.facade.categorize_scope_item(&handle, &item, category)?;
                println!("{} is now {}", item, category.label());
            }
            ScopeCommand::Add { text, category } => {
                let id = self.facade.add_scope_item(&handle, &text, category)?;
                println!("Added {} ({})", id, category.label());
            }
            ScopeCommand::Approve => {
                print!("{}", ConsoleFormatter::format_approved_text(&self.facade.approve_scope(&handle)?));
            }
        }
        Ok(())
    }
}

/// Exporter format for a file extension
fn format_for_path(path: &Path) -> Result<String> {
    match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
        Some("json") => Ok("json".to_string()),
        Some("md") | Some("markdown") => Ok("markdown".to_string()),
        _ => bail!("Cannot tell the format of {}; pass --format", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_for_path() {
        assert_eq!(format_for_path(Path::new("visiedocument.JSON")).unwrap(), "json");
        assert_eq!(format_for_path(Path::new("out/visie.md")).unwrap(), "markdown");
        assert!(format_for_path(Path::new("visie.docx")).is_err());
    }
}
