//! Declarative field rules per flow kind
//!
//! Each [`FieldRule`] pairs label text with a capture shape and a target
//! field. The tables are plain data; [`crate::miner`] compiles them into
//! regexes once and applies them to normalized reply text.

use draftwright_domain::{ChargeField, FlowKind, HeaderField, ItemField};

/// Shape of the bold value that follows a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureShape {
    /// Free text up to the closing bold marker, trimmed
    Text,

    /// Leading run of digits ("001" from "001/KLM-QT")
    Digits,

    /// Money with optional "Rp" prefix and thousands separators,
    /// normalized to bare digits; trailing unit text ("/ritase") is ignored
    Currency,

    /// Quantity with thousands separators and an optional decimal part,
    /// normalized to digits with a `.` decimal point ("2,5 Ton" gives "2.5")
    Count,
}

/// Where a captured value lands in the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Scalar header field
    Header(HeaderField),

    /// Field of the pending line item
    Item(ItemField),

    /// Auxiliary charge
    Charge(ChargeField),
}

/// One label-anchored extraction rule
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Label variants, matched case-insensitively before a colon
    pub labels: &'static [&'static str],

    /// Shape of the captured value
    pub shape: CaptureShape,

    /// Destination field
    pub target: Target,

    /// Phrases meaning "not known yet"; a capture containing one is dropped
    pub placeholders: &'static [&'static str],
}

/// All rules for one flow kind
#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    /// Flow the rules apply to
    pub flow: FlowKind,

    /// Field rules in evaluation order
    pub rules: &'static [FieldRule],

    /// Item fields that must co-occur in one reply to form a pending item
    pub required_item_fields: &'static [ItemField],

    /// Lowercase phrase announcing that the document was created
    pub completion_marker: &'static str,
}

/// Phrases the assistant uses while a value is still unknown
pub const UNKNOWN_PLACEHOLDERS: &[&str] = &[
    "belum ditemukan",
    "tidak ditemukan",
    "belum diketahui",
    "tidak diketahui",
    "belum ada",
    "belum diisi",
];

/// Pattern for the "item registered" acknowledgement ("Item #2 tersimpan");
/// group 1 is the item number
pub const ITEM_CONFIRMED_PATTERN: &str = r"(?i)\bitem\s*#\s*(\d+)\b[^\n]{0,80}?\btersimpan\b";

const fn text(
    labels: &'static [&'static str],
    target: Target,
) -> FieldRule {
    FieldRule {
        labels,
        shape: CaptureShape::Text,
        target,
        placeholders: UNKNOWN_PLACEHOLDERS,
    }
}

const fn digits(labels: &'static [&'static str], target: Target) -> FieldRule {
    FieldRule {
        labels,
        shape: CaptureShape::Digits,
        target,
        placeholders: &[],
    }
}

const fn currency(labels: &'static [&'static str], target: Target) -> FieldRule {
    FieldRule {
        labels,
        shape: CaptureShape::Currency,
        target,
        placeholders: &[],
    }
}

const fn count(labels: &'static [&'static str], target: Target) -> FieldRule {
    FieldRule {
        labels,
        shape: CaptureShape::Count,
        target,
        placeholders: &[],
    }
}

const SEQUENCE: FieldRule = digits(&["Nomor Surat"], Target::Header(HeaderField::SequencePrefix));
const COMPANY_NAME: FieldRule = text(
    &["Nama Perusahaan", "Nama"],
    Target::Header(HeaderField::CompanyName),
);
const COMPANY_ADDRESS: FieldRule = text(
    &["Alamat Perusahaan", "Alamat"],
    Target::Header(HeaderField::CompanyAddress),
);
const WASTE_CODE: FieldRule = text(&["Kode Limbah", "Kode"], Target::Item(ItemField::Code));
const WASTE_CATEGORY: FieldRule = text(
    &["Jenis Limbah", "Jenis"],
    Target::Item(ItemField::Category),
);
const UNIT: FieldRule = text(&["Satuan"], Target::Item(ItemField::Unit));
const TRANSPORT: FieldRule = currency(
    &["Harga Transportasi", "Transportasi"],
    Target::Charge(ChargeField::TransportCharge),
);
const MOU_FEE: FieldRule = currency(
    &["Biaya MoU", "Harga MoU", "MoU"],
    Target::Charge(ChargeField::ServiceCharge),
);
const PAYMENT_TERM: FieldRule = digits(&["Termin"], Target::Charge(ChargeField::PaymentTermDays));

static QUOTATION_RULES: &[FieldRule] = &[
    SEQUENCE,
    COMPANY_NAME,
    COMPANY_ADDRESS,
    WASTE_CODE,
    WASTE_CATEGORY,
    UNIT,
    currency(&["Harga"], Target::Item(ItemField::Price)),
    count(&["Jumlah", "Qty"], Target::Item(ItemField::Quantity)),
    TRANSPORT,
    MOU_FEE,
    PAYMENT_TERM,
];

static MOU_RULES: &[FieldRule] = &[
    digits(
        &["Nomor Surat", "Nomor MoU", "No. MoU"],
        Target::Header(HeaderField::SequencePrefix),
    ),
    text(&["Pihak Pertama"], Target::Header(HeaderField::FirstParty)),
    text(&["Pihak Kedua"], Target::Header(HeaderField::SecondParty)),
    text(&["Pihak Ketiga"], Target::Header(HeaderField::ThirdParty)),
    COMPANY_NAME,
    COMPANY_ADDRESS,
    WASTE_CODE,
    WASTE_CATEGORY,
    UNIT,
    TRANSPORT,
    MOU_FEE,
    PAYMENT_TERM,
];

static INVOICE_RULES: &[FieldRule] = &[
    SEQUENCE,
    text(
        &["Nomor Invoice", "No. Invoice", "No Invoice"],
        Target::Header(HeaderField::InvoiceNumber),
    ),
    text(
        &["Nama Perusahaan", "Nama", "Kepada"],
        Target::Header(HeaderField::CompanyName),
    ),
    COMPANY_ADDRESS,
    text(
        &["Deskripsi", "Jenis Limbah", "Jenis"],
        Target::Item(ItemField::Category),
    ),
    WASTE_CODE,
    count(&["Jumlah", "Qty", "Kuantitas"], Target::Item(ItemField::Quantity)),
    UNIT,
    currency(&["Harga Satuan", "Harga"], Target::Item(ItemField::Price)),
    TRANSPORT,
    digits(
        &["Jatuh Tempo", "Termin"],
        Target::Charge(ChargeField::PaymentTermDays),
    ),
];

static RULE_SETS: [RuleSet; 3] = [
    RuleSet {
        flow: FlowKind::Quotation,
        rules: QUOTATION_RULES,
        required_item_fields: &[
            ItemField::Code,
            ItemField::Category,
            ItemField::Unit,
            ItemField::Price,
        ],
        completion_marker: "quotation berhasil dibuat",
    },
    RuleSet {
        flow: FlowKind::MemorandumOfUnderstanding,
        rules: MOU_RULES,
        required_item_fields: &[ItemField::Code, ItemField::Category],
        completion_marker: "mou berhasil dibuat",
    },
    RuleSet {
        flow: FlowKind::Invoice,
        rules: INVOICE_RULES,
        required_item_fields: &[
            ItemField::Category,
            ItemField::Quantity,
            ItemField::Unit,
            ItemField::Price,
        ],
        completion_marker: "invoice berhasil dibuat",
    },
];

/// Rule set for a flow kind; `None` has no rules
pub fn rule_set(flow: FlowKind) -> Option<&'static RuleSet> {
    RULE_SETS.iter().find(|set| set.flow == flow)
}

/// All rule sets
pub fn rule_sets() -> &'static [RuleSet] {
    &RULE_SETS
}

/// Reduce a formatted money amount to bare digits
///
/// Dots and commas are thousands separators, except a comma followed by one
/// or two trailing characters, which is a decimal part and dropped
/// ("15.000,00" and "15.000,-" both give "15000").
///
/// # Examples
///
/// ```
/// use draftwright_extractor::rules::normalize_currency;
///
/// assert_eq!(normalize_currency("Rp 1.200.000").as_deref(), Some("1200000"));
/// assert_eq!(normalize_currency("15.000,00").as_deref(), Some("15000"));
/// assert_eq!(normalize_currency("Rp -"), None);
/// ```
pub fn normalize_currency(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let integral = match trimmed.rfind(',') {
        Some(idx) if trimmed.len() - idx <= 3 => &trimmed[..idx],
        _ => trimmed,
    };
    let digits = ascii_digits(integral);
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Reduce a formatted quantity to digits, keeping any decimal part
///
/// The last `,` or `.` is a decimal point when one or two digits follow it;
/// every other separator groups thousands. Trailing zeros of the fraction
/// are dropped.
///
/// # Examples
///
/// ```
/// use draftwright_extractor::rules::normalize_count;
///
/// assert_eq!(normalize_count("1.500").as_deref(), Some("1500"));
/// assert_eq!(normalize_count("2,5").as_deref(), Some("2.5"));
/// assert_eq!(normalize_count("1.250,75").as_deref(), Some("1250.75"));
/// ```
pub fn normalize_count(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches(['.', ',']);
    let (integral, fraction) = match trimmed.rfind(['.', ',']) {
        Some(idx) if (2..=3).contains(&(trimmed.len() - idx)) => {
            (&trimmed[..idx], &trimmed[idx + 1..])
        }
        _ => (trimmed, ""),
    };

    let integral = ascii_digits(integral);
    if integral.is_empty() {
        return None;
    }
    let fraction = ascii_digits(fraction);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        Some(integral)
    } else {
        Some(format!("{}.{}", integral, fraction))
    }
}

fn ascii_digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_concrete_flow_has_rules() {
        for kind in FlowKind::CONCRETE {
            let set = rule_set(kind).unwrap();
            assert!(!set.rules.is_empty());
            assert!(!set.required_item_fields.is_empty());
            assert_eq!(set.completion_marker, set.completion_marker.to_lowercase());
        }
        assert!(rule_set(FlowKind::None).is_none());
    }

    #[test]
    fn test_required_item_fields_have_rules() {
        for set in rule_sets() {
            for field in set.required_item_fields {
                assert!(
                    set.rules.iter().any(|r| r.target == Target::Item(*field)),
                    "{} requires {} but has no rule for it",
                    set.flow,
                    field
                );
            }
        }
    }

    #[test]
    fn test_identifying_fields_have_rules() {
        for set in rule_sets() {
            for field in set.flow.identifying_fields() {
                assert!(set.rules.iter().any(|r| r.target == Target::Header(*field)));
            }
        }
    }

    #[test]
    fn test_normalize_currency() {
        assert_eq!(normalize_currency("1.200.000").as_deref(), Some("1200000"));
        assert_eq!(normalize_currency("1,200,000").as_deref(), Some("1200000"));
        assert_eq!(normalize_currency("15.000,-").as_deref(), Some("15000"));
        assert_eq!(normalize_currency("15000").as_deref(), Some("15000"));
        assert_eq!(normalize_currency("").as_deref(), None);
    }

    #[test]
    fn test_normalize_count_keeps_decimals() {
        assert_eq!(normalize_count("2,5").as_deref(), Some("2.5"));
        assert_eq!(normalize_count("2.5").as_deref(), Some("2.5"));
        assert_eq!(normalize_count("2,50").as_deref(), Some("2.5"));
        assert_eq!(normalize_count("3,00").as_deref(), Some("3"));
        assert_eq!(normalize_count("1.500").as_deref(), Some("1500"));
        assert_eq!(normalize_count("12.000,25").as_deref(), Some("12000.25"));
        assert_eq!(normalize_count("10,").as_deref(), Some("10"));
        assert_eq!(normalize_count(",5").as_deref(), None);
    }

    #[test]
    fn test_quantities_use_count_shape() {
        for set in rule_sets() {
            for rule in set.rules {
                if rule.target == Target::Item(ItemField::Quantity) {
                    assert_eq!(rule.shape, CaptureShape::Count, "{}", set.flow);
                }
            }
        }
    }
}
