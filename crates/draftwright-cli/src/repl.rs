//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! The user plays both sides of the conversation: `>` lines are what the
//! chat user sends, `<` lines are what the backend answered.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use draftwright_domain::FlowKind;
use draftwright_extractor::{normalize_user_input, SessionId, SessionRegistry};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the interactive REPL.
pub fn run_repl(config: &Config, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("Draftwright REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut session = ReplSession::new(config)?;

    loop {
        match editor.readline(&session.prompt()) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => match session.execute(cmd, formatter) {
                        Ok(lines) => {
                            for line in lines {
                                println!("{}", line);
                            }
                        }
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Leave the REPL
    Exit,
    /// Print usage
    Help,
    /// Message sent by the chat user
    User(String),
    /// Reply received from the backend
    Reply(String),
    /// Task type attached to following user messages; `None` clears it
    Hint(Option<FlowKind>),
    /// Show the live draft
    Draft,
    /// Try to collect a snapshot
    Finalize,
    /// Start a new session
    Reset,
}

/// Parse a REPL command line.
pub fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let line = line.trim();

    if let Some(text) = line.strip_prefix('>') {
        return Ok(ReplCommand::User(text.trim().to_string()));
    }
    if let Some(text) = line.strip_prefix('<') {
        return Ok(ReplCommand::Reply(text.trim().to_string()));
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(first) = parts.first() else {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    };

    match *first {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "draft" => Ok(ReplCommand::Draft),
        "finalize" => Ok(ReplCommand::Finalize),
        "reset" => Ok(ReplCommand::Reset),
        "hint" => parse_hint_command(&parts[1..]),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            first
        ))),
    }
}

fn parse_hint_command(args: &[&str]) -> Result<ReplCommand> {
    match args {
        [] | ["none"] => Ok(ReplCommand::Hint(None)),
        [kind] => match FlowKind::from_task_type(kind) {
            FlowKind::None => Err(CliError::InvalidInput(format!(
                "Unknown task type: {}. Use quotation, mou or invoice.",
                kind
            ))),
            flow => Ok(ReplCommand::Hint(Some(flow))),
        },
        _ => Err(CliError::InvalidInput("Usage: hint [quotation|mou|invoice|none]".to_string())),
    }
}

/// State of one REPL conversation.
pub struct ReplSession {
    registry: SessionRegistry,
    id: SessionId,
    hint: Option<FlowKind>,
}

impl ReplSession {
    /// Open a session with the configured extractor settings.
    pub fn new(config: &Config) -> Result<Self> {
        let mut registry = SessionRegistry::new(config.extractor.clone())?;
        let id = registry.open();
        Ok(Self {
            registry,
            id,
            hint: None,
        })
    }

    /// Current session id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Prompt showing the active flow.
    pub fn prompt(&self) -> String {
        match self.registry.get(self.id).map(|e| e.active_flow()) {
            Ok(flow) if flow.is_concrete() => format!("draftwright [{}]> ", flow),
            _ => "draftwright> ".to_string(),
        }
    }

    /// Execute a command, returning the lines to print.
    pub fn execute(&mut self, cmd: ReplCommand, formatter: &Formatter) -> Result<Vec<String>> {
        let mut out = Vec::new();
        match cmd {
            ReplCommand::Exit | ReplCommand::Help => {}
            ReplCommand::User(text) => {
                let text = normalize_user_input(&text);
                let hint = self.hint;
                let extractor = self.registry.get_mut(self.id)?;
                let transition = extractor.notify_user_message_with_hint(&text, hint);
                out.extend(formatter.format_transition(transition));
            }
            ReplCommand::Reply(text) => {
                let extractor = self.registry.get_mut(self.id)?;
                let outcome = extractor.mine_reply(&text);
                if outcome.duplicate {
                    out.push(formatter.warning("Same reply as before; skipped"));
                }
                if outcome.fields_updated > 0 {
                    out.push(formatter.info(&format!("{} field(s) updated", outcome.fields_updated)));
                }
                if outcome.item_pending {
                    out.push(formatter.info("Item awaiting confirmation"));
                }
                if outcome.item_promoted {
                    out.push(formatter.success("Item added"));
                }
                if outcome.completion_seen {
                    out.push(formatter.info("Completion marker seen; run 'finalize'"));
                }
            }
            ReplCommand::Hint(hint) => {
                self.hint = hint;
                let shown = hint.map_or_else(|| "none".to_string(), |h| h.to_string());
                out.push(formatter.info(&format!("Task type: {}", shown)));
            }
            ReplCommand::Draft => {
                let extractor = self.registry.get(self.id)?;
                out.push(formatter.format_draft(extractor.draft(), extractor.has_pending_item())?);
            }
            ReplCommand::Finalize => {
                let extractor = self.registry.get_mut(self.id)?;
                match extractor.try_finalize(None)? {
                    Some(snapshot) => out.push(formatter.format_snapshot(&snapshot)?),
                    None => out.push(formatter.warning("Nothing to finalize yet")),
                }
            }
            ReplCommand::Reset => {
                self.id = self.registry.reset(self.id)?;
                self.hint = None;
                out.push(formatter.success(&format!("New session {}", self.id)));
            }
        }
        Ok(out)
    }
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!(
        "Failed to initialize editor: {}",
        e
    )))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  > <text>                       - Send a user message");
    println!("  < <text>                       - Feed a backend reply (HTML allowed)");
    println!("  hint [quotation|mou|invoice]   - Task type for following messages");
    println!("  draft                          - Show the live draft");
    println!("  finalize                       - Collect the finished document");
    println!("  reset                          - Start a new session");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}
