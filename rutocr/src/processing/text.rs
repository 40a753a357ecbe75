use std::sync::LazyLock;

use regex::Regex;

static HORIZONTAL_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid horizontal whitespace pattern"));

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline pattern"));

/// Canonicalize OCR output for matching and display.
///
/// CR and CRLF become `\n`, every other control character (C0, DEL, C1)
/// becomes a space, runs of spaces/tabs collapse to one space, three or more
/// newlines collapse to a blank line, and the result is trimmed.
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let printable: String = unified
        .chars()
        .map(|c| if c != '\n' && c.is_control() { ' ' } else { c })
        .collect();

    let spaced = HORIZONTAL_WHITESPACE.replace_all(&printable, " ");
    let collapsed = EXCESS_NEWLINES.replace_all(&spaced, "\n\n");

    collapsed.trim().to_string()
}
