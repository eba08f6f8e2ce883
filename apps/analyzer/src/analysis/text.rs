//! Shared text helpers for the analyzers.

use std::sync::LazyLock;

use regex::Regex;

/// Maximal runs of ASCII letters, basic Cyrillic letters, digits and underscores.
/// Everything else separates words, accented Latin letters included.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-zА-Яа-я0-9_]+").expect("valid word regex"));

/// Splits text into word tokens, preserving order.
pub fn tokenize(text: &str) -> Vec<&str> {
    WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// True if `haystack` contains any of `needles` as a plain substring.
pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
