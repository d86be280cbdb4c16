//! Normalization of user input before it is sent to the backend
//!
//! Both functions work the same way for typed and dictated text. They only
//! touch what the user sends; replies go through [`crate::normalize_markup`].

use regex::Regex;
use std::sync::LazyLock;

/// Replacement for an address the user cannot supply
pub const ADDRESS_FALLBACK: &str = "Di tempat";

fn compile(pattern: &str) -> Regex {
    #[allow(clippy::expect_used)]
    Regex::new(pattern).expect("static input pattern")
}

static SPOKEN_DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?:strip|minus|dash|garis)\b"));

static DASH_SPACING_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s*-\s*"));

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

static ADDRESS_UNKNOWN_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)alamat.*\b(?:tidak|gak|ga|nggak)\b.*(?:ditemukan|ketemu|ada)",
        r"(?i)\b(?:tidak|gak|ga|nggak)\s*(?:tahu|tau)\s*alamat",
        r"(?i)alamat\w*\s*(?:kosong|belum ada)",
        r"(?i)\b(?:tidak|ga|nggak) ada alamat",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

/// Clean up dictated text
///
/// Spoken dash words become `-`, spaces around dashes disappear and runs of
/// whitespace collapse to one space.
///
/// # Examples
///
/// ```
/// use draftwright_extractor::input::normalize_dictation;
///
/// assert_eq!(normalize_dictation("A336 strip 1"), "A336-1");
/// assert_eq!(normalize_dictation("  oli   bekas "), "oli bekas");
/// ```
pub fn normalize_dictation(raw: &str) -> String {
    let text = raw.trim();
    if text.is_empty() {
        return String::new();
    }
    let text = SPOKEN_DASH_RE.replace_all(text, "-");
    let text = DASH_SPACING_RE.replace_all(&text, "-");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Replace "I don't know the address" answers with [`ADDRESS_FALLBACK`]
///
/// A lone `-` is an explicit "no value" and is kept as is.
pub fn normalize_address_fallback(raw: &str) -> String {
    let text = raw.trim();
    if text.is_empty() || text == "-" {
        return text.to_string();
    }
    if ADDRESS_UNKNOWN_RES.iter().any(|re| re.is_match(text)) {
        ADDRESS_FALLBACK.to_string()
    } else {
        text.to_string()
    }
}

/// Both normalizations, dictation first
pub fn normalize_user_input(raw: &str) -> String {
    normalize_address_fallback(&normalize_dictation(raw))
}
