//! Draftwright CLI library.
//!
//! This library provides the core functionality for the Draftwright command-line interface,
//! including configuration management, transcript replay, the interactive REPL and output
//! formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;
pub mod transcript;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use transcript::{Transcript, Turn};
