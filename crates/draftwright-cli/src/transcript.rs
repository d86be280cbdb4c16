//! Recorded conversations for replay.
//!
//! A transcript is a list of turns. Each turn may carry a user message, the
//! backend reply that followed it, or both; a turn can also reset the
//! session. TOML and JSON use the same shape:
//!
//! ```toml
//! [[turns]]
//! user = "Buatkan quotation"
//! reply = "Nama: **PT Contoh Abadi**"
//!
//! [[turns]]
//! reply = "Item #1 tersimpan"
//! ```

use crate::error::{CliError, Result};
use draftwright_domain::FlowKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One step of a recorded conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Turn {
    /// Message the user sent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Task type the client attached to the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// Backend reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,

    /// Start a new session before this turn
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub reset: bool,
}

impl Turn {
    /// Hint as a flow kind; unknown task types give `None`.
    pub fn hint_kind(&self) -> Option<FlowKind> {
        self.hint
            .as_deref()
            .map(FlowKind::from_task_type)
            .filter(FlowKind::is_concrete)
    }
}

/// A recorded conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Turns in order
    #[serde(default)]
    pub turns: Vec<Turn>,
}

impl Transcript {
    /// Load a transcript; `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let transcript = if is_json {
            Self::from_json(&contents)?
        } else {
            Self::from_toml(&contents)?
        };
        transcript.validate()?;
        Ok(transcript)
    }

    /// Parse TOML.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Parse JSON.
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Reject transcripts with empty turns.
    pub fn validate(&self) -> Result<()> {
        if self.turns.is_empty() {
            return Err(CliError::Transcript("transcript has no turns".into()));
        }
        for (idx, turn) in self.turns.iter().enumerate() {
            if turn.user.is_none() && turn.reply.is_none() && !turn.reset {
                return Err(CliError::Transcript(format!(
                    "turn {} has neither user, reply nor reset",
                    idx + 1
                )));
            }
        }
        Ok(())
    }
}
