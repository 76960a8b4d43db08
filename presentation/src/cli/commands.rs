//! CLI command definitions

use clap::{Parser, Subcommand};
use consent_application::RankAction;
use consent_domain::{FlowStep, QuestionType, ScopeCategory, VoteValue};
use std::path::PathBuf;

/// CLI arguments for consent
#[derive(Parser, Debug)]
#[command(name = "consent")]
#[command(author, version, about = "Staged consensus workflow for a shared vision document")]
#[command(long_about = r#"
Consent walks a group from individual canvas answers to one approved vision
document. Every wording is adopted by consent: it passes only when everyone
has voted and nobody objected.

The flow has eight steps:
  upload → visie_huidige → visie_gewenste → visie_beweging
         → visie_stakeholders → doelen → scope → export

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./consent.toml      Project-level config
3. ~/.config/consent/config.toml   Global config

Example:
  consent session new "Teamdag 2026"
  consent doc import anne.txt bram.md
  consent analyze current_situation
  consent propose current_situation
  consent vote <proposal> variant-3 anne agree
  consent approve <proposal> variant-3
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Session to work on (defaults to the most recently updated open session)
    #[arg(short, long, global = true, value_name = "ID")]
    pub session: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create, list, resume and delete sessions
    #[command(subcommand)]
    Session(SessionCommand),

    /// Import and correct canvas documents
    #[command(subcommand)]
    Doc(DocCommand),

    /// Inspect and navigate the flow
    #[command(subcommand)]
    Step(StepCommand),

    /// Show the consensus matrix of the answers
    Matrix {
        /// Questions to include (default: all eight)
        questions: Vec<QuestionType>,
    },

    /// Cluster the answers to one or more questions into themes
    Analyze {
        /// Questions to analyze (default: those of the current step)
        questions: Vec<QuestionType>,
    },

    /// Edit a theme of a stored analysis
    Theme {
        question: QuestionType,
        theme: String,

        #[arg(long, value_name = "NAME", conflicts_with_all = ["describe", "delete"])]
        rename: Option<String>,

        #[arg(long, value_name = "TEXT", conflicts_with = "delete")]
        describe: Option<String>,

        #[arg(long)]
        delete: bool,
    },

    /// Generate three wording variants for a question
    Propose {
        question: QuestionType,

        /// Restrict the proposal to one theme of the stored analysis
        #[arg(long, value_name = "THEME_ID")]
        theme: Option<String>,
    },

    /// List stored proposals
    Proposals {
        /// Only proposals for this question
        question: Option<QuestionType>,
    },

    /// Hand-edit the text of a variant before voting
    EditVariant {
        proposal: String,
        variant: String,
        text: String,
    },

    /// Cast a vote on a variant
    Vote {
        proposal: String,
        variant: String,
        respondent: String,

        /// agree, disagree or abstain
        value: VoteValue,

        /// Required with a disagree vote
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Show the consent tally of every variant of a proposal
    Tally { proposal: String },

    /// Adopt a variant's text once consent is reached
    Approve {
        proposal: String,
        variant: String,

        /// Approve without consent; recorded in the audit trail
        #[arg(long)]
        force: bool,
    },

    /// Cluster, dot-vote and rank the goals
    #[command(subcommand)]
    Goals(GoalsCommand),

    /// Collect, categorize and approve out-of-scope items
    #[command(subcommand)]
    Scope(ScopeCommand),

    /// Build and write the final vision document
    Export {
        /// Output format (markdown, json)
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Write to this path instead of the suggested file name
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Load the texts of an exported document back into the session
    Restore {
        path: PathBuf,

        /// Input format (default: from the file extension)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Write every stored entity of the session as one JSON bundle
    Dump {
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Start a new session
    New { name: String },
    /// List sessions, most recently updated first
    List,
    /// Show a session and its flow progress
    Show,
    /// Show the session that would be resumed
    Resume,
    Rename { name: String },
    /// Persist the session state and close it; it is completed once every topic is approved
    Close,
    /// Delete the session and everything stored for it
    Delete {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocCommand {
    /// Import canvas documents (txt, md)
    Import {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Respondent name (only with a single file)
        #[arg(short, long)]
        respondent: Option<String>,
    },
    List,
    Show { document: String },
    /// Correct one extracted answer
    Edit {
        document: String,
        question: QuestionType,
        answer: String,
    },
    Remove { document: String },
}

#[derive(Subcommand, Debug)]
pub enum StepCommand {
    /// Show the status of every step
    Status,
    /// Complete the current step and move to the next
    Next,
    /// Navigate to a step
    Goto { step: FlowStep },
    /// Mark a step completed (default: the current step)
    Complete { step: Option<FlowStep> },
    Unlock { step: FlowStep },
}

#[derive(Subcommand, Debug)]
pub enum GoalsCommand {
    /// Cluster the goals of every document into a fresh goal board
    Cluster,
    /// Show clusters, dot totals and the ranking
    Board,
    /// Keep only these clusters for voting
    Select {
        #[arg(required = true)]
        clusters: Vec<String>,
    },
    Rename { cluster: String, name: String },
    /// Give a cluster one point (or take it back)
    Dot {
        voter: String,
        cluster: String,

        #[arg(long)]
        remove: bool,
    },
    /// Submit a voter's dot ballot
    Submit { voter: String },
    /// Change the top-N ranking
    #[command(subcommand)]
    Rank(RankCommand),
    /// Set the wording a ranked cluster is approved with
    Formulate { cluster: String, text: String },
    /// Approve the ranking as goal_1..goal_N
    Approve,
}

#[derive(Subcommand, Debug)]
pub enum RankCommand {
    Add { cluster: String },
    Remove { cluster: String },
    Up { cluster: String },
    Down { cluster: String },
    /// Move a cluster onto the position of another
    Onto { cluster: String, target: String },
}

impl From<RankCommand> for RankAction {
    fn from(command: RankCommand) -> Self {
        match command {
            RankCommand::Add { cluster } => RankAction::Add(cluster),
            RankCommand::Remove { cluster } => RankAction::Remove(cluster),
            RankCommand::Up { cluster } => RankAction::MoveUp(cluster),
            RankCommand::Down { cluster } => RankAction::MoveDown(cluster),
            RankCommand::Onto { cluster, target } => RankAction::MoveOnto { cluster, target },
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ScopeCommand {
    /// Collect items from the out_of_scope answers (replaces the list)
    Collect,
    List,
    /// Categorize an item: in_scope, out_of_scope or unclear
    Set {
        item: String,
        category: ScopeCategory,
    },
    /// Add an item by hand
    Add {
        text: String,

        #[arg(short, long, default_value = "unclear")]
        category: ScopeCategory,
    },
    /// Approve the out-of-scope list; unclear items become out of scope
    Approve,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_vote_with_comment() {
        let cli = Cli::try_parse_from([
            "consent", "vote", "p1", "variant-2", "anne", "disagree", "-c", "Te vaag",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Vote { value, comment, .. }) => {
                assert_eq!(value, VoteValue::Disagree);
                assert_eq!(comment.as_deref(), Some("Te vaag"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_question_and_step_names() {
        let cli = Cli::try_parse_from(["consent", "analyze", "goal-1", "current_situation"]).unwrap();
        match cli.command {
            Some(Command::Analyze { questions }) => {
                assert_eq!(questions, vec![QuestionType::Goal1, QuestionType::CurrentSituation]);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["consent", "step", "goto", "doelen"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Step(StepCommand::Goto { step: FlowStep::Doelen }))
        ));

        assert!(Cli::try_parse_from(["consent", "analyze", "weather"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["consent", "tally", "p1", "-vv", "--session", "s1"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.session.as_deref(), Some("s1"));
    }

    #[test]
    fn test_scope_add_defaults_to_unclear() {
        let cli = Cli::try_parse_from(["consent", "scope", "add", "Huisvesting"]).unwrap();
        match cli.command {
            Some(Command::Scope(ScopeCommand::Add { text, category })) => {
                assert_eq!(text, "Huisvesting");
                assert_eq!(category, ScopeCategory::Unclear);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rank_command_maps_to_action() {
        let action: RankAction = RankCommand::Onto {
            cluster: "c2".to_string(),
            target: "c1".to_string(),
        }
        .into();
        assert_eq!(
            action,
            RankAction::MoveOnto {
                cluster: "c2".to_string(),
                target: "c1".to_string()
            }
        );
    }
}
