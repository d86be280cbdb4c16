//! Normalize reply markup into a canonical `Label: **value**` form
//!
//! Backend replies arrive as a mix of HTML (`<b>`, `<br>`), markdown bold,
//! HTML entities and JSON/backslash escapes, sometimes escaped twice. The
//! rules in [`crate::rules`] only ever see the canonical form produced here.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Upper bound on decode passes for multiply-escaped text
const MAX_PASSES: usize = 5;

fn compile(pattern: &str) -> Regex {
    // Patterns below are string literals; a failure is a programming error.
    #[allow(clippy::expect_used)]
    Regex::new(pattern).expect("static markup pattern")
}

static UNICODE_ESCAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\\u00(3c|3e|2f|3a|2a)"));

static BACKSLASH_ESCAPE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"\\([<>*/:])"));

static LITERAL_CONTROL_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"\\([nrt])"));

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)&(nbsp|quot|#39|#x27|apos|#58|colon|#42|ast|amp|lt|gt);"));

static BOLD_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)<\s*/?\s*(?:b|strong)(?:\s[^<>]*)?\s*>"));

static BREAK_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)<\s*br\s*/?\s*>|<\s*/\s*(?:p|div|li)\s*>"));

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)<\s*li(?:\s[^<>]*)?>"));

static ANY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"<[^<>]*>"));

static TRAILING_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"[ \t]+\n"));

static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"\n{3,}"));

/// Normalize one raw reply
///
/// Never fails: anything that does not look like markup is left alone, and
/// unbalanced tags just lose their angle brackets or stay as text.
///
/// # Examples
///
/// ```
/// use draftwright_extractor::normalize_markup;
///
/// assert_eq!(normalize_markup("Nama: <b>PT Contoh</b><br/>"), "Nama: **PT Contoh**");
/// assert_eq!(normalize_markup("Nama: &lt;b&gt;PT Contoh&lt;/b&gt;"), "Nama: **PT Contoh**");
/// ```
pub fn normalize_markup(raw: &str) -> String {
    let mut text = raw.replace('\u{a0}', " ");

    for _ in 0..MAX_PASSES {
        let before = text.clone();
        text = decode_once(&text);
        text = fold_tags(&text);
        text = tidy_whitespace(&text);
        if text == before {
            break;
        }
    }

    text
}

fn decode_once(text: &str) -> String {
    let text = UNICODE_ESCAPE_RE.replace_all(text, |caps: &Captures| {
        match caps[1].to_ascii_lowercase().as_str() {
            "3c" => "<",
            "3e" => ">",
            "2f" => "/",
            "3a" => ":",
            _ => "*",
        }
        .to_string()
    });
    let text = LITERAL_CONTROL_RE.replace_all(&text, |caps: &Captures| {
        match &caps[1] {
            "n" => "\n",
            "t" => " ",
            _ => "",
        }
        .to_string()
    });
    let text = BACKSLASH_ESCAPE_RE.replace_all(&text, "$1");
    ENTITY_RE
        .replace_all(&text, |caps: &Captures| {
            match caps[1].to_ascii_lowercase().as_str() {
                "nbsp" => " ",
                "quot" => "\"",
                "#39" | "#x27" | "apos" => "'",
                "#58" | "colon" => ":",
                "#42" | "ast" => "*",
                "amp" => "&",
                "lt" => "<",
                _ => ">",
            }
            .to_string()
        })
        .into_owned()
}

fn fold_tags(text: &str) -> String {
    let text = BOLD_TAG_RE.replace_all(text, "**");
    let text = BREAK_TAG_RE.replace_all(&text, "\n");
    let text = LIST_ITEM_RE.replace_all(&text, "• ");
    ANY_TAG_RE.replace_all(&text, "").into_owned()
}

fn tidy_whitespace(text: &str) -> String {
    let text = text.replace('\r', "");
    let text = TRAILING_SPACE_RE.replace_all(&text, "\n");
    let text = BLANK_LINES_RE.replace_all(&text, "\n\n");
    text.trim().to_string()
}
