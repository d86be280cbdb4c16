//! Configuration for the Extractor

use crate::error::ExtractorError;
use draftwright_domain::FlowKind;
use serde::{Deserialize, Serialize};

/// Values filled into a snapshot when the dialogue never mentioned them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDefaults {
    /// Sequence prefix of the letter number
    pub sequence_prefix: String,

    /// Transport charge per trip, separator-free digits
    pub transport_charge: String,

    /// Payment term in days
    pub payment_term_days: String,
}

impl Default for SnapshotDefaults {
    /// Values printed on quotations when nothing else is known
    fn default() -> Self {
        Self {
            sequence_prefix: "001".to_string(),
            transport_charge: "1200000".to_string(),
            payment_term_days: "14".to_string(),
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Order in which flow keyword sets are tested; first match wins
    pub flow_precedence: Vec<FlowKind>,

    /// Skip a reply identical to the one mined just before it
    ///
    /// Only saves work and reports [`MineOutcome::duplicate`]: item
    /// confirmations are numbered, so a redelivered reply never adds an
    /// item twice either way.
    ///
    /// [`MineOutcome::duplicate`]: crate::MineOutcome::duplicate
    pub skip_repeated_replies: bool,

    /// Apply the caller's task-type hint when a message names no flow and
    /// no flow is active yet
    pub apply_hint_on_neutral: bool,

    /// Fill missing prefix / transport / term at snapshot time
    pub snapshot_defaults: Option<SnapshotDefaults>,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.flow_precedence.len() != FlowKind::CONCRETE.len() {
            return Err(ExtractorError::Config(format!(
                "flow_precedence must list {} flow kinds, got {}",
                FlowKind::CONCRETE.len(),
                self.flow_precedence.len()
            )));
        }
        for kind in FlowKind::CONCRETE {
            if !self.flow_precedence.contains(&kind) {
                return Err(ExtractorError::Config(format!(
                    "flow_precedence is missing '{}'",
                    kind
                )));
            }
        }
        Ok(())
    }

    /// Legacy preset: quotations always carry a prefix, transport charge and
    /// payment term, falling back to [`SnapshotDefaults::default`]
    pub fn legacy() -> Self {
        Self {
            snapshot_defaults: Some(SnapshotDefaults::default()),
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

impl Default for ExtractorConfig {
    /// MoU before invoice before quotation, duplicate replies skipped,
    /// snapshots carry mined fields only
    fn default() -> Self {
        Self {
            flow_precedence: vec![
                FlowKind::MemorandumOfUnderstanding,
                FlowKind::Invoice,
                FlowKind::Quotation,
            ],
            skip_repeated_replies: true,
            apply_hint_on_neutral: true,
            snapshot_defaults: None,
        }
    }
}
