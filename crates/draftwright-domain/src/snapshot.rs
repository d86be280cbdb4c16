//! Snapshot record - the immutable hand-off to document renderers

use crate::draft::{DraftRecord, LineItem};
use crate::field::{ChargeField, HeaderField};
use crate::flow::FlowKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Finalized copy of a draft
///
/// Snapshots are only produced from drafts that passed the minimum
/// completeness check, and they never carry a line item that was still
/// under construction. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    flow_kind: FlowKind,
    header_fields: BTreeMap<HeaderField, String>,
    line_items: Vec<LineItem>,
    auxiliary_charges: BTreeMap<ChargeField, String>,
}

impl SnapshotRecord {
    /// Freeze a draft into a snapshot
    pub fn from_draft(draft: DraftRecord) -> Self {
        let (flow_kind, header_fields, line_items, auxiliary_charges) = draft.into_parts();
        Self {
            flow_kind,
            header_fields,
            line_items,
            auxiliary_charges,
        }
    }

    /// Flow that produced this snapshot
    pub fn flow_kind(&self) -> FlowKind {
        self.flow_kind
    }

    /// Get a header field
    pub fn header(&self, field: HeaderField) -> Option<&str> {
        self.header_fields.get(&field).map(String::as_str)
    }

    /// All header fields
    pub fn header_fields(&self) -> &BTreeMap<HeaderField, String> {
        &self.header_fields
    }

    /// Line items in order of confirmation
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Get an auxiliary charge
    pub fn charge(&self, field: ChargeField) -> Option<&str> {
        self.auxiliary_charges.get(&field).map(String::as_str)
    }

    /// All auxiliary charges
    pub fn auxiliary_charges(&self) -> &BTreeMap<ChargeField, String> {
        &self.auxiliary_charges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ItemField;

    #[test]
    fn test_snapshot_keeps_all_draft_fields() {
        let mut draft = DraftRecord::new(FlowKind::Quotation);
        draft.set_header(HeaderField::CompanyName, "PT Contoh Abadi");
        draft.set_charge(ChargeField::TransportCharge, "1200000");
        draft.push_item(LineItem::new().with(ItemField::Code, "B105"));

        let snapshot = SnapshotRecord::from_draft(draft);
        assert_eq!(snapshot.flow_kind(), FlowKind::Quotation);
        assert_eq!(snapshot.header(HeaderField::CompanyName), Some("PT Contoh Abadi"));
        assert_eq!(snapshot.charge(ChargeField::TransportCharge), Some("1200000"));
        assert_eq!(snapshot.line_items().len(), 1);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut draft = DraftRecord::new(FlowKind::Invoice);
        draft.set_header(HeaderField::InvoiceNumber, "INV/2025/07");

        let json = serde_json::to_value(SnapshotRecord::from_draft(draft)).unwrap();
        assert_eq!(json["flow_kind"], "invoice");
        assert_eq!(json["header_fields"]["invoice_number"], "INV/2025/07");
        assert!(json["line_items"].as_array().unwrap().is_empty());
    }
}
