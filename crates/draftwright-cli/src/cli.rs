//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use draftwright_domain::FlowKind;
use std::path::PathBuf;

/// Draftwright - Follow document-creation chats and extract their drafts.
#[derive(Debug, Parser)]
#[command(name = "draftwright")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DRAFTWRIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (flow kinds and counts only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a recorded transcript through one extractor
    Replay(ReplayArgs),

    /// Show which flow a user message starts
    Detect(DetectArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the replay command.
#[derive(Debug, Parser)]
pub struct ReplayArgs {
    /// Transcript file (.toml or .json)
    pub file: PathBuf,

    /// Task type sent with every user turn that has no hint of its own
    #[arg(short = 't', long, value_enum)]
    pub task_type: Option<FlowArg>,
}

/// Arguments for the detect command.
#[derive(Debug, Parser)]
pub struct DetectArgs {
    /// Message text
    #[arg(required = true)]
    pub text: Vec<String>,
}

/// Flow argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FlowArg {
    /// Quotation (penawaran)
    Quotation,
    /// Memorandum of understanding
    Mou,
    /// Invoice
    Invoice,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<FlowArg> for FlowKind {
    fn from(flow: FlowArg) -> Self {
        match flow {
            FlowArg::Quotation => FlowKind::Quotation,
            FlowArg::Mou => FlowKind::MemorandumOfUnderstanding,
            FlowArg::Invoice => FlowKind::Invoice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_means_repl() {
        let cli = Cli::parse_from(["draftwright"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_replay_command() {
        let cli = Cli::parse_from(["draftwright", "-vv", "replay", "chat.toml", "-t", "mou"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Replay(args)) => {
                assert_eq!(args.file, PathBuf::from("chat.toml"));
                assert_eq!(args.task_type, Some(FlowArg::Mou));
            }
            _ => panic!("Expected Replay command"),
        }
    }

    #[test]
    fn test_detect_joins_words() {
        let cli = Cli::parse_from(["draftwright", "detect", "buat", "invoice"]);
        match cli.command {
            Some(Command::Detect(args)) => assert_eq!(args.text, vec!["buat", "invoice"]),
            _ => panic!("Expected Detect command"),
        }
    }

    #[test]
    fn test_flow_conversion() {
        let flow: FlowKind = FlowArg::Mou.into();
        assert_eq!(flow, FlowKind::MemorandumOfUnderstanding);
    }
}
