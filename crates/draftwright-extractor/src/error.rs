//! Error types for the Extractor
//!
//! Malformed or partial reply text is never an error; mining simply finds
//! nothing. These variants cover caller misuse and configuration only.

use thiserror::Error;

/// Errors that can occur while driving an extractor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractorError {
    /// `try_finalize` was called before any reply was mined in this session
    #[error("Finalize requested before any reply was mined in this session")]
    FinalizeBeforeReply,

    /// Session id not known to the registry
    #[error("Unknown session: {0}")]
    UnknownSession(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ExtractorError {
    fn from(e: toml::de::Error) -> Self {
        ExtractorError::TomlParse(e.to_string())
    }
}
