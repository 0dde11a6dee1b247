use std::borrow::Cow;
use std::sync::LazyLock;

use encoding_rs::WINDOWS_1252;
use regex::Regex;

static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]*[\r\n]+[ \t]*").expect("hardcoded line break regex is valid")
});
static DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*-[ \t]+").expect("hardcoded dash regex is valid"));
static PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{2}) ").expect("hardcoded prefix regex is valid"));
static MEAN_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" M$").expect("hardcoded mean suffix regex is valid"));
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]*─[ \t]*").expect("hardcoded separator regex is valid")
});

fn collapse_line_breaks(value: &str) -> Cow<'_, str> {
    LINE_BREAK_RE.replace_all(value, " ")
}

/// Cleans one extracted column header.
///
/// `"VR 165-\n169"` becomes `"VR: 165 - 169"` and `"QR M"` becomes `"QR: Mean"`.
pub(crate) fn clean_header(raw: &str) -> String {
    let joined = collapse_line_breaks(raw.trim());
    let dashed = DASH_RE.replace_all(&joined, " - ");
    let prefixed = PREFIX_RE.replace(&dashed, "$1: ");
    MEAN_SUFFIX_RE.replace(&prefixed, " Mean").into_owned()
}

/// Undoes UTF-8 text that was decoded as Windows-1252 (`"â”€"` back to `"─"`).
///
/// Text that does not round-trip cleanly is returned unchanged.
pub(crate) fn repair_mojibake(value: &str) -> Cow<'_, str> {
    if value.is_ascii() {
        return Cow::Borrowed(value);
    }

    let (bytes, _, had_errors) = WINDOWS_1252.encode(value);
    if had_errors {
        return Cow::Borrowed(value);
    }

    match std::str::from_utf8(&bytes) {
        Ok(repaired) if repaired != value => Cow::Owned(repaired.to_string()),
        _ => Cow::Borrowed(value),
    }
}

/// Cleans one category label: repairs mojibake, turns the stray box-drawing
/// separator into `": "` and joins wrapped lines.
pub(crate) fn clean_label(raw: &str) -> String {
    let repaired = repair_mojibake(raw.trim());
    let separated = SEPARATOR_RE.replace_all(&repaired, ": ");
    collapse_line_breaks(&separated).trim().to_string()
}
