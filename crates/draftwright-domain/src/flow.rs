//! Flow kind - which document-creation dialogue is active

use crate::field::HeaderField;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document-creation dialogue a session is currently in
///
/// The flow kind decides which field set, item group and completion
/// marker apply to incoming replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    /// Price quotation for waste handling
    Quotation,

    /// Tripartite memorandum of understanding
    #[serde(rename = "mou")]
    MemorandumOfUnderstanding,

    /// Invoice
    Invoice,

    /// No flow active
    #[default]
    None,
}

impl FlowKind {
    /// Every concrete (non-`None`) flow kind
    pub const CONCRETE: [FlowKind; 3] = [
        FlowKind::MemorandumOfUnderstanding,
        FlowKind::Invoice,
        FlowKind::Quotation,
    ];

    /// Get the flow kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Quotation => "quotation",
            FlowKind::MemorandumOfUnderstanding => "mou",
            FlowKind::Invoice => "invoice",
            FlowKind::None => "none",
        }
    }

    /// Parse a caller task type ("quotation", "penawaran", "mou", "invoice")
    ///
    /// Unknown task types map to `FlowKind::None`, never to an error: the
    /// hint is advisory.
    ///
    /// # Examples
    ///
    /// ```
    /// use draftwright_domain::FlowKind;
    ///
    /// assert_eq!(FlowKind::from_task_type("MoU"), FlowKind::MemorandumOfUnderstanding);
    /// assert_eq!(FlowKind::from_task_type("penawaran"), FlowKind::Quotation);
    /// assert_eq!(FlowKind::from_task_type("kontrak"), FlowKind::None);
    /// ```
    pub fn from_task_type(task_type: &str) -> Self {
        match task_type.trim().to_lowercase().as_str() {
            "quotation" | "penawaran" => FlowKind::Quotation,
            "mou" | "memorandum_of_understanding" => FlowKind::MemorandumOfUnderstanding,
            "invoice" => FlowKind::Invoice,
            _ => FlowKind::None,
        }
    }

    /// Whether this is a concrete flow (anything but `None`)
    pub fn is_concrete(&self) -> bool {
        !matches!(self, FlowKind::None)
    }

    /// Header fields that identify the counterparty of this flow
    ///
    /// A draft needs at least one of these before it may be finalized.
    pub fn identifying_fields(&self) -> &'static [HeaderField] {
        match self {
            FlowKind::Quotation => &[HeaderField::CompanyName],
            FlowKind::MemorandumOfUnderstanding => {
                &[HeaderField::SecondParty, HeaderField::CompanyName]
            }
            FlowKind::Invoice => &[HeaderField::CompanyName, HeaderField::InvoiceNumber],
            FlowKind::None => &[],
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FlowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(FlowKind::None),
            other => match FlowKind::from_task_type(other) {
                FlowKind::None => Err(format!("Invalid flow kind: {}", s)),
                kind => Ok(kind),
            },
        }
    }
}
