//! Draft record - the in-progress accumulation of fields for the active flow

use crate::field::{ChargeField, HeaderField, ItemField};
use crate::flow::FlowKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single line item of a document
///
/// Which fields are present depends on the flow that produced the item:
/// quotation items carry code, category, unit and price, invoice items
/// carry a quantity instead of a code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItem {
    fields: BTreeMap<ItemField, String>,
}

impl LineItem {
    /// Create an empty line item
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    ///
    /// # Examples
    ///
    /// ```
    /// use draftwright_domain::{ItemField, LineItem};
    ///
    /// let item = LineItem::new()
    ///     .with(ItemField::Code, "B105")
    ///     .with(ItemField::Price, "15000");
    /// assert_eq!(item.get(ItemField::Code), Some("B105"));
    /// ```
    pub fn with(mut self, field: ItemField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field, replacing any previous value
    pub fn set(&mut self, field: ItemField, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    /// Get a field value
    pub fn get(&self, field: ItemField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Whether every listed field is present
    pub fn has_all(&self, fields: &[ItemField]) -> bool {
        fields.iter().all(|f| self.fields.contains_key(f))
    }

    /// Iterate over populated fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (ItemField, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of populated fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is populated
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Accumulated fields of one flow in one session
///
/// The draft only ever grows through the extractor: header fields and
/// charges are overwritten by newer values, line items are appended in
/// order of confirmation and never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRecord {
    flow_kind: FlowKind,
    header_fields: BTreeMap<HeaderField, String>,
    line_items: Vec<LineItem>,
    auxiliary_charges: BTreeMap<ChargeField, String>,
}

impl DraftRecord {
    /// Create an empty draft for the given flow
    pub fn new(flow_kind: FlowKind) -> Self {
        Self {
            flow_kind,
            header_fields: BTreeMap::new(),
            line_items: Vec::new(),
            auxiliary_charges: BTreeMap::new(),
        }
    }

    /// Flow this draft belongs to
    pub fn flow_kind(&self) -> FlowKind {
        self.flow_kind
    }

    /// Get a header field
    pub fn header(&self, field: HeaderField) -> Option<&str> {
        self.header_fields.get(&field).map(String::as_str)
    }

    /// All populated header fields
    pub fn header_fields(&self) -> &BTreeMap<HeaderField, String> {
        &self.header_fields
    }

    /// Confirmed line items in order of confirmation
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Get an auxiliary charge
    pub fn charge(&self, field: ChargeField) -> Option<&str> {
        self.auxiliary_charges.get(&field).map(String::as_str)
    }

    /// All populated auxiliary charges
    pub fn auxiliary_charges(&self) -> &BTreeMap<ChargeField, String> {
        &self.auxiliary_charges
    }

    /// Set a header field. Returns true if the stored value changed.
    pub fn set_header(&mut self, field: HeaderField, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.header_fields.get(&field) == Some(&value) {
            return false;
        }
        self.header_fields.insert(field, value);
        true
    }

    /// Set an auxiliary charge. Returns true if the stored value changed.
    pub fn set_charge(&mut self, field: ChargeField, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.auxiliary_charges.get(&field) == Some(&value) {
            return false;
        }
        self.auxiliary_charges.insert(field, value);
        true
    }

    /// Append a confirmed line item
    pub fn push_item(&mut self, item: LineItem) {
        self.line_items.push(item);
    }

    /// Whether at least one identifying header field of the flow is present
    pub fn has_identity(&self) -> bool {
        self.flow_kind
            .identifying_fields()
            .iter()
            .any(|f| self.header_fields.contains_key(f))
    }

    /// Minimum completeness for a snapshot: an identity and at least one item
    pub fn is_finalizable(&self) -> bool {
        self.has_identity() && !self.line_items.is_empty()
    }

    /// Whether nothing has been mined into this draft yet
    pub fn is_empty(&self) -> bool {
        self.header_fields.is_empty()
            && self.line_items.is_empty()
            && self.auxiliary_charges.is_empty()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        FlowKind,
        BTreeMap<HeaderField, String>,
        Vec<LineItem>,
        BTreeMap<ChargeField, String>,
    ) {
        (
            self.flow_kind,
            self.header_fields,
            self.line_items,
            self.auxiliary_charges,
        )
    }
}
