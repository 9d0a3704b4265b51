//! Structural text-to-Markdown normalizer.
//!
//! Turns loosely formatted notes into Markdown: the first block becomes a
//! title, `label: value` lines get bold labels, and multi-line blocks become
//! bullet lists. The transform is total and deterministic.

mod sections;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Two or more consecutive newlines.
static BLANK_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("blank line regex"));

/// Normalize free text into Markdown.
///
/// Sections are separated by blank lines in both input and output. Empty
/// or whitespace-only input yields an empty string.
pub fn normalize(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let formatted: Vec<String> = split_sections(trimmed)
        .enumerate()
        .map(|(index, section)| sections::format_section(section, index))
        .filter(|section| !section.is_empty())
        .collect();

    debug!(sections = formatted.len(), "text normalized to markdown");

    formatted.join("\n\n")
}

/// Count whitespace-separated words, ignoring Markdown markers such as
/// `#`, `-`, and `**`.
pub fn word_count(markdown: &str) -> usize {
    markdown
        .split_whitespace()
        .filter(|word| word.chars().any(char::is_alphanumeric))
        .count()
}

/// Trimmed, non-empty blank-line-delimited sections.
fn split_sections(text: &str) -> impl Iterator<Item = &str> {
    BLANK_LINE_RE
        .split(text)
        .map(str::trim)
        .filter(|section| !section.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
