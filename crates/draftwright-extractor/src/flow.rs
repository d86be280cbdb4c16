//! Classify user messages into flow kinds by keyword membership

use draftwright_domain::FlowKind;

/// Keywords for one flow kind (lowercased)
#[derive(Debug, Clone, Copy)]
pub struct KeywordSet {
    /// Flow the keywords announce
    pub flow: FlowKind,

    /// Matched anywhere in the message
    pub phrases: &'static [&'static str],

    /// Matched only as whole words; for tokens short enough to hide inside
    /// unrelated words ("mou" in "amount")
    pub words: &'static [&'static str],
}

/// MoU keywords, including spelled-out and voice-transcribed variants
pub const MOU_KEYWORDS: KeywordSet = KeywordSet {
    flow: FlowKind::MemorandumOfUnderstanding,
    phrases: &[
        "memorandum",
        "nota kesepahaman",
        "kesepahaman",
        "tripartit",
        "m.o.u",
        "em o u",
        "emou",
    ],
    words: &["mou", "mo u"],
};

/// Invoice keywords, including common misspellings
///
/// "faktur" and "tagihan" also come up when talking about payment terms,
/// so they only count as part of a request to make one.
pub const INVOICE_KEYWORDS: KeywordSet = KeywordSet {
    flow: FlowKind::Invoice,
    phrases: &[
        "invoice",
        "invois",
        "invoys",
        "infois",
        "in voice",
        "buat faktur",
        "buatkan faktur",
        "bikin faktur",
        "buat tagihan",
        "buatkan tagihan",
        "bikin tagihan",
    ],
    words: &[],
};

/// Quotation keywords, including the Indonesian "penawaran"
pub const QUOTATION_KEYWORDS: KeywordSet = KeywordSet {
    flow: FlowKind::Quotation,
    phrases: &[
        "quotation",
        "qoutation",
        "quatation",
        "quotasi",
        "kuotasi",
        "kwotasi",
        "penawaran",
    ],
    words: &[],
};

impl KeywordSet {
    /// Whether lowercased text contains any keyword of this set
    pub fn matches(&self, lower: &str) -> bool {
        if self.phrases.iter().any(|kw| lower.contains(kw)) {
            return true;
        }
        if self.words.is_empty() {
            return false;
        }
        let tokens: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();
        self.words.iter().any(|word| {
            let parts: Vec<&str> = word.split(' ').collect();
            tokens.windows(parts.len()).any(|window| window == parts.as_slice())
        })
    }
}

fn keyword_set(flow: FlowKind) -> Option<&'static KeywordSet> {
    match flow {
        FlowKind::MemorandumOfUnderstanding => Some(&MOU_KEYWORDS),
        FlowKind::Invoice => Some(&INVOICE_KEYWORDS),
        FlowKind::Quotation => Some(&QUOTATION_KEYWORDS),
        FlowKind::None => None,
    }
}

/// Pure keyword classifier
///
/// Keyword sets are tested in a fixed precedence order and the first set
/// with a hit wins, so a message naming two flows ("penawaran untuk MoU")
/// always resolves the same way. Position and match length play no part.
#[derive(Debug, Clone)]
pub struct FlowDetector {
    order: Vec<&'static KeywordSet>,
}

impl FlowDetector {
    /// Create a detector testing flows in the given order
    ///
    /// `FlowKind::None` entries are ignored.
    pub fn new(precedence: &[FlowKind]) -> Self {
        Self {
            order: precedence.iter().filter_map(|k| keyword_set(*k)).collect(),
        }
    }

    /// Classify a message; `FlowKind::None` when no keyword matched
    ///
    /// # Examples
    ///
    /// ```
    /// use draftwright_domain::FlowKind;
    /// use draftwright_extractor::FlowDetector;
    ///
    /// let detector = FlowDetector::default();
    /// assert_eq!(detector.detect("Buatkan MoU dong"), FlowKind::MemorandumOfUnderstanding);
    /// assert_eq!(detector.detect("Total amount berapa?"), FlowKind::None);
    /// ```
    pub fn detect(&self, text: &str) -> FlowKind {
        let lower = text.to_lowercase();
        self.order
            .iter()
            .find(|set| set.matches(&lower))
            .map(|set| set.flow)
            .unwrap_or(FlowKind::None)
    }

    /// Flows in the order they are tested
    pub fn precedence(&self) -> Vec<FlowKind> {
        self.order.iter().map(|set| set.flow).collect()
    }
}

impl Default for FlowDetector {
    /// MoU, then invoice, then quotation
    fn default() -> Self {
        Self::new(&[
            FlowKind::MemorandumOfUnderstanding,
            FlowKind::Invoice,
            FlowKind::Quotation,
        ])
    }
}
