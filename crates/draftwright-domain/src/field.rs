//! Field keys for header fields, line-item fields and auxiliary charges
//!
//! The key sets are closed: every flow draws its fields from these enums,
//! so a draft can never hold a field nobody knows how to render.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar header field of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    /// Leading sequence number of the letter number ("001" in 001/KLM-QT/IV/2025)
    SequencePrefix,

    /// Counterparty company name
    CompanyName,

    /// Counterparty company address
    CompanyAddress,

    /// Invoice number as issued
    InvoiceNumber,

    /// First party of a tripartite agreement
    FirstParty,

    /// Second party of a tripartite agreement
    SecondParty,

    /// Third party of a tripartite agreement
    ThirdParty,
}

impl HeaderField {
    /// Get the field name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderField::SequencePrefix => "sequence_prefix",
            HeaderField::CompanyName => "company_name",
            HeaderField::CompanyAddress => "company_address",
            HeaderField::InvoiceNumber => "invoice_number",
            HeaderField::FirstParty => "first_party",
            HeaderField::SecondParty => "second_party",
            HeaderField::ThirdParty => "third_party",
        }
    }
}

/// Field of a single line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    /// Category or label (waste type, service description)
    Category,

    /// Catalogue code (waste code such as "B105")
    Code,

    /// Unit of measure
    Unit,

    /// Unit price as a separator-free digit string
    Price,

    /// Quantity as a separator-free digit string
    Quantity,
}

impl ItemField {
    /// Get the field name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemField::Category => "category",
            ItemField::Code => "code",
            ItemField::Unit => "unit",
            ItemField::Price => "price",
            ItemField::Quantity => "quantity",
        }
    }
}

/// Charge that is orthogonal to line items
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeField {
    /// Flat transport charge per trip
    TransportCharge,

    /// Recurring service charge (yearly MoU fee)
    ServiceCharge,

    /// Payment term length in days
    PaymentTermDays,
}

impl ChargeField {
    /// Get the field name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeField::TransportCharge => "transport_charge",
            ChargeField::ServiceCharge => "service_charge",
            ChargeField::PaymentTermDays => "payment_term_days",
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ChargeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
