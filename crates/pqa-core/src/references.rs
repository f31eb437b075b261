//! Splitting of numbered reference lists.
//!
//! The analysis server returns citations as a single block of text:
//!
//! ```text
//! 1. Smith et al. (2021). Gene editing in practice.
//!    Nature Methods 18, 1-10.
//! 2. Jones (2019). Another paper.
//! ```
//!
//! [`parse_references`] turns that into one string per entry.

use once_cell::sync::Lazy;
use regex::Regex;

/// A line that opens a new reference: optional indentation, an integer, a
/// dot, then whitespace or the end of the line (the entry text may start on
/// the next line).
static NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\.(\s|$)").expect("numbered line pattern is valid"));

/// Returns true if `line` starts a new numbered reference.
pub fn is_numbered_line(line: &str) -> bool {
    NUMBERED_LINE.is_match(line)
}

/// Splits a numbered reference list into individual entries.
///
/// Wrapped lines stay attached to the entry they follow. Text before the
/// first numbered line is discarded. Each entry is trimmed.
///
/// ```
/// use pqa_core::references::parse_references;
///
/// let refs = parse_references(Some("1. Smith et al.\ncontinued line\n2. Jones"));
/// assert_eq!(refs, vec!["1. Smith et al.\ncontinued line", "2. Jones"]);
/// assert!(parse_references(None).is_empty());
/// ```
pub fn parse_references(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };

    let mut references = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in text.lines() {
        if is_numbered_line(line) {
            if let Some(lines) = current.take() {
                push_entry(&mut references, &lines);
            }
            current = Some(vec![line]);
        } else if let Some(lines) = current.as_mut() {
            lines.push(line);
        }
        // Lines before the first numbered one are preamble.
    }

    if let Some(lines) = current {
        push_entry(&mut references, &lines);
    }

    references
}

fn push_entry(references: &mut Vec<String>, lines: &[&str]) {
    let entry = lines.join("\n");
    let entry = entry.trim();
    if !entry.is_empty() {
        references.push(entry.to_string());
    }
}
