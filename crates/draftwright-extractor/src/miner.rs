//! Apply the rule tables to one normalized reply

use crate::rules::{self, CaptureShape, FieldRule, RuleSet, Target, ITEM_CONFIRMED_PATTERN};
use draftwright_domain::{ChargeField, FlowKind, HeaderField, ItemField, LineItem};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Outcome of testing one rule against a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    /// Label not present, or present without a value of the right shape
    Absent,

    /// Label present but the value is a "not known yet" phrase
    Placeholder(String),

    /// Normalized value
    Value(String),
}

/// Everything one reply yields for the active flow
///
/// Produced by [`FieldMiner::mine`]; the extractor decides how it merges
/// into the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinedFields {
    /// Header fields found, in rule order
    pub headers: Vec<(HeaderField, String)>,

    /// Auxiliary charges found, in rule order
    pub charges: Vec<(ChargeField, String)>,

    /// Complete line item group, if every required item field matched
    pub item: Option<LineItem>,

    /// Item fields that matched while the group stayed incomplete
    pub partial_item_fields: Vec<ItemField>,

    /// Targets whose value was a placeholder
    pub suppressed: Vec<Target>,

    /// Number of the item an "Item #n tersimpan" acknowledgement confirmed
    pub confirmed_item: Option<u32>,

    /// Completion marker of the flow seen
    pub completion: bool,
}

impl MinedFields {
    /// Whether the reply produced nothing at all
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
            && self.charges.is_empty()
            && self.item.is_none()
            && self.confirmed_item.is_none()
            && !self.completion
    }
}

struct CompiledRule {
    rule: FieldRule,
    regex: Regex,
}

struct CompiledRuleSet {
    set: &'static RuleSet,
    rules: Vec<CompiledRule>,
}

fn rule_pattern(rule: &FieldRule) -> String {
    let labels: Vec<String> = rule
        .labels
        .iter()
        .map(|label| regex::escape(label).replace(' ', r"\s+"))
        .collect();
    let value = match rule.shape {
        CaptureShape::Text => r"\*\*\s*([^*\n]+?)\s*\*\*",
        CaptureShape::Digits => r"\*\*\s*(\d+)[^*\n]*?\*\*",
        CaptureShape::Currency => r"\*\*\s*(?:Rp\.?\s*)?(\d[\d.,]*)[^*\n]*?\*\*",
        CaptureShape::Count => r"\*\*\s*(\d[\d.,]*)[^*\n]*?\*\*",
    };
    // A label starts a line (after any bullet or emoji) or follows a field
    // separator, so "Satuan" never matches the tail of "Harga Satuan". The
    // gap between label and value may not cross a line, a bold run or the
    // colon of the next label.
    format!(
        r"(?im)(?:^[^\p{{L}}\p{{N}}:\n]*|[,;:•|(]\s*)(?:{})\s*:[^*:\n]*?{}",
        labels.join("|"),
        value
    )
}

fn compile_rule(rule: &FieldRule) -> Regex {
    // Patterns are generated from the static rule tables and escaped labels.
    #[allow(clippy::expect_used)]
    Regex::new(&rule_pattern(rule)).expect("rule table pattern")
}

static COMPILED: LazyLock<Vec<CompiledRuleSet>> = LazyLock::new(|| {
    rules::rule_sets()
        .iter()
        .map(|set| CompiledRuleSet {
            set,
            rules: set
                .rules
                .iter()
                .map(|rule| CompiledRule {
                    rule: *rule,
                    regex: compile_rule(rule),
                })
                .collect(),
        })
        .collect()
});

static ITEM_CONFIRMED_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(ITEM_CONFIRMED_PATTERN).expect("item confirmed pattern")
});

fn evaluate(rule: &FieldRule, regex: &Regex, text: &str) -> RuleMatch {
    let Some(raw) = regex.captures(text).and_then(|caps| caps.get(1)) else {
        return RuleMatch::Absent;
    };
    let raw = raw.as_str().trim();

    let value = match rule.shape {
        CaptureShape::Text => raw.to_string(),
        CaptureShape::Digits => raw.to_string(),
        CaptureShape::Currency => match rules::normalize_currency(raw) {
            Some(digits) => digits,
            None => return RuleMatch::Absent,
        },
        CaptureShape::Count => match rules::normalize_count(raw) {
            Some(number) => number,
            None => return RuleMatch::Absent,
        },
    };

    let lower = value.to_lowercase();
    let is_placeholder = value.is_empty()
        || value.chars().all(|c| c == '-')
        || rule.placeholders.iter().any(|p| lower.contains(p));
    if is_placeholder {
        RuleMatch::Placeholder(value)
    } else {
        RuleMatch::Value(value)
    }
}

/// Test a single rule against normalized text
///
/// Compiles the rule on every call; meant for table-driven checks and
/// tooling, not for the hot path.
pub fn match_rule(rule: &FieldRule, text: &str) -> RuleMatch {
    evaluate(rule, &compile_rule(rule), text)
}

/// Whether the text acknowledges that an item was stored
pub fn is_item_confirmed(text: &str) -> bool {
    ITEM_CONFIRMED_RE.is_match(text)
}

/// Number of the first item the text acknowledges as stored
///
/// Numbers too large for a `u32` are not treated as acknowledgements.
pub fn confirmed_item_number(text: &str) -> Option<u32> {
    ITEM_CONFIRMED_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|number| number.as_str().parse().ok())
}

/// Mines labelled fields out of normalized replies
///
/// Stateless: rule tables are compiled once per process and shared by every
/// extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMiner;

impl FieldMiner {
    /// Create a miner
    pub fn new() -> Self {
        Self
    }

    /// Mine one normalized reply for the given flow
    ///
    /// `FlowKind::None` has no rules and always yields an empty result.
    pub fn mine(&self, text: &str, flow: FlowKind) -> MinedFields {
        let mut mined = MinedFields::default();
        let Some(compiled) = COMPILED.iter().find(|c| c.set.flow == flow) else {
            return mined;
        };

        let mut item = LineItem::new();
        for CompiledRule { rule, regex } in &compiled.rules {
            match evaluate(rule, regex, text) {
                RuleMatch::Absent => {}
                RuleMatch::Placeholder(value) => {
                    debug!("Suppressed placeholder for {:?}: '{}'", rule.target, value);
                    mined.suppressed.push(rule.target);
                }
                RuleMatch::Value(value) => {
                    debug!("Rule hit for {:?}: '{}'", rule.target, value);
                    match rule.target {
                        Target::Header(field) => mined.headers.push((field, value)),
                        Target::Charge(field) => mined.charges.push((field, value)),
                        Target::Item(field) => item.set(field, value),
                    }
                }
            }
        }

        if !item.is_empty() {
            if item.has_all(compiled.set.required_item_fields) {
                mined.item = Some(item);
            } else {
                mined.partial_item_fields = item.iter().map(|(field, _)| field).collect();
                debug!(
                    "Incomplete {} item group ignored: {:?}",
                    flow, mined.partial_item_fields
                );
            }
        }

        mined.confirmed_item = confirmed_item_number(text);
        mined.completion = text.to_lowercase().contains(compiled.set.completion_marker);
        mined
    }
}
