//! Reply reformatting for readability
//!
//! Assistant replies arrive as a single run of prose. Before they enter the
//! transcript each sentence is put in its own paragraph.

use regex::Regex;
use std::sync::OnceLock;

/// Separator placed between sentences
const PARAGRAPH_BREAK: &str = "\n\n";

fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // A run of non-terminators followed by one or more terminators
    PATTERN.get_or_init(|| Regex::new(r"[^.!?]*[.!?]+").expect("sentence pattern is valid"))
}

/// Split `text` into sentences and join them with a blank line.
///
/// Sentences are the maximal left-to-right substrings ending in `.`, `!` or
/// `?`. Text with no terminator at all is returned unchanged. Any trailing
/// fragment after the last terminator is kept as a final paragraph.
#[must_use]
pub fn reformat(text: &str) -> String {
    let pattern = sentence_pattern();

    let mut segments: Vec<&str> = Vec::new();
    let mut consumed = 0;
    for m in pattern.find_iter(text) {
        segments.push(m.as_str().trim());
        consumed = m.end();
    }

    if segments.is_empty() {
        return text.to_string();
    }

    if let Some(rest) = text.get(consumed..) {
        let rest = rest.trim();
        if !rest.is_empty() {
            segments.push(rest);
        }
    }

    segments.join(PARAGRAPH_BREAK)
}
