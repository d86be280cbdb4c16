//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use draftwright_domain::{
    ChargeField, DraftRecord, FlowKind, HeaderField, ItemField, LineItem, SnapshotRecord,
};
use draftwright_extractor::FlowTransition;
use std::collections::BTreeMap;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const ITEM_COLUMNS: [ItemField; 5] = [
    ItemField::Code,
    ItemField::Category,
    ItemField::Quantity,
    ItemField::Unit,
    ItemField::Price,
];

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

/// Borrowed view shared by drafts and snapshots.
struct RecordView<'a> {
    flow_kind: FlowKind,
    header_fields: &'a BTreeMap<HeaderField, String>,
    line_items: &'a [LineItem],
    auxiliary_charges: &'a BTreeMap<ChargeField, String>,
}

impl<'a> From<&'a SnapshotRecord> for RecordView<'a> {
    fn from(snapshot: &'a SnapshotRecord) -> Self {
        Self {
            flow_kind: snapshot.flow_kind(),
            header_fields: snapshot.header_fields(),
            line_items: snapshot.line_items(),
            auxiliary_charges: snapshot.auxiliary_charges(),
        }
    }
}

impl<'a> From<&'a DraftRecord> for RecordView<'a> {
    fn from(draft: &'a DraftRecord) -> Self {
        Self {
            flow_kind: draft.flow_kind(),
            header_fields: draft.header_fields(),
            line_items: draft.line_items(),
            auxiliary_charges: draft.auxiliary_charges(),
        }
    }
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Output format in use.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a finalized snapshot.
    pub fn format_snapshot(&self, snapshot: &SnapshotRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(snapshot)?),
            OutputFormat::Table => Ok(self.format_record_table(snapshot.into())),
            OutputFormat::Quiet => Ok(format_record_quiet(snapshot.into())),
        }
    }

    /// Format the live draft, if any.
    pub fn format_draft(&self, draft: Option<&DraftRecord>, pending_item: bool) -> Result<String> {
        let Some(draft) = draft else {
            return Ok(match self.format {
                OutputFormat::Json => "null".to_string(),
                OutputFormat::Table => self.colorize("No draft yet.", "yellow"),
                OutputFormat::Quiet => String::new(),
            });
        };

        match self.format {
            OutputFormat::Json => {
                let view = RecordView::from(draft);
                let json = serde_json::json!({
                    "flow_kind": view.flow_kind,
                    "header_fields": view.header_fields,
                    "line_items": view.line_items,
                    "auxiliary_charges": view.auxiliary_charges,
                    "pending_item": pending_item,
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                let mut out = self.format_record_table(draft.into());
                if pending_item {
                    out.push('\n');
                    out.push_str(&self.info("One item awaiting confirmation"));
                }
                Ok(out)
            }
            OutputFormat::Quiet => Ok(format_record_quiet(draft.into())),
        }
    }

    /// Format a detected flow kind.
    pub fn format_flow(&self, flow: FlowKind) -> String {
        match self.format {
            OutputFormat::Json => serde_json::json!({ "flow_kind": flow }).to_string(),
            OutputFormat::Quiet => flow.to_string(),
            OutputFormat::Table if flow.is_concrete() => {
                self.success(&format!("Flow: {}", flow))
            }
            OutputFormat::Table => self.warning("No flow keyword found"),
        }
    }

    /// Describe a flow transition; `None` when nothing changed.
    pub fn format_transition(&self, transition: FlowTransition) -> Option<String> {
        match transition {
            FlowTransition::Unchanged => None,
            FlowTransition::Started(flow) => Some(self.info(&format!("Flow started: {}", flow))),
            FlowTransition::Switched {
                from,
                to,
                discarded: true,
            } => Some(self.warning(&format!(
                "Switched from {} to {}; unsaved {} data discarded",
                from, to, from
            ))),
            FlowTransition::Switched { from, to, .. } => {
                Some(self.info(&format!("Switched from {} to {}", from, to)))
            }
        }
    }

    fn format_record_table(&self, view: RecordView<'_>) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["flow_kind".to_string(), view.flow_kind.to_string()]);
        for (field, value) in view.header_fields {
            builder.push_record([field.to_string(), value.clone()]);
        }
        for (field, value) in view.auxiliary_charges {
            builder.push_record([field.to_string(), value.clone()]);
        }

        let mut fields = builder.build();
        fields
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        if view.line_items.is_empty() {
            return format!("{}\n{}", fields, self.colorize("No line items.", "yellow"));
        }

        let mut builder = Builder::default();
        let mut header = vec!["#".to_string()];
        header.extend(ITEM_COLUMNS.iter().map(|f| f.to_string()));
        builder.push_record(header);

        for (idx, item) in view.line_items.iter().enumerate() {
            let mut row = vec![(idx + 1).to_string()];
            row.extend(
                ITEM_COLUMNS
                    .iter()
                    .map(|f| item.get(*f).unwrap_or("-").to_string()),
            );
            builder.push_record(row);
        }

        let mut items = builder.build();
        items
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!("{}\n{}", fields, items)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// One line: flow kind and item count.
fn format_record_quiet(view: RecordView<'_>) -> String {
    format!("{} {}", view.flow_kind, view.line_items.len())
}
