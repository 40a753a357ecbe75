//! Chilean RUT detection in recognized text.
//!
//! A RUT is written as one to three digits, one or two `.`-separated groups
//! of three digits, a `-` and a check digit that is either a digit or `K`
//! (e.g. `12.345.678-5`, `1.234.567-K`).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static RUT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{1,3}(?:\.[0-9]{3}){1,2}-[0-9kK]").expect("valid RUT pattern")
});

/// All non-overlapping RUT-shaped matches, left to right, verbatim.
pub fn extract_rut_candidates(text: &str) -> Vec<&str> {
    RUT_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Correct glyphs OCR commonly confuses with digits, then drop anything that
/// cannot appear in a RUT.
///
/// `O`/`o` become `0` and `l`/`I` become `1`. The check digit `K`/`k` is
/// kept as-is.
pub fn normalize_rut(candidate: &str) -> String {
    candidate
        .chars()
        .map(|c| match c {
            'O' | 'o' => '0',
            'l' | 'I' => '1',
            other => other,
        })
        .filter(|c| c.is_ascii_digit() || matches!(*c, 'k' | 'K' | '.' | '-'))
        .collect()
}

/// Normalize candidates, dropping empty results and duplicates.
///
/// The first occurrence of each identifier wins, so the output keeps the
/// order in which identifiers appear in the text.
pub fn collect_ruts<'a, I>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(normalize_rut)
        .filter(|rut| !rut.is_empty())
        .filter(|rut| seen.insert(rut.clone()))
        .collect()
}

pub fn extract_ruts(text: &str) -> Vec<String> {
    collect_ruts(extract_rut_candidates(text))
}
