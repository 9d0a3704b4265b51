//! Per-section formatting rules.
//!
//! Each rule is a function `&str -> String` over one blank-line-delimited
//! section. [`format_section`] picks the rule from the section's position
//! and line count.
//!
//! In a multi-line section a line that already carries a complete marker
//! (`* x`, `3. x`) keeps that marker as written. Only lines without one get
//! `- `, after any partial marker (`-x`, `•x`, `3.x`) is stripped.

use std::sync::LazyLock;

use regex::Regex;

/// A complete list item: `- x`, `* x`, `+ x`, `1. x`, `1) x`.
static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*+]|\d+[.)])\s+\S").expect("list item regex")
});

/// A candidate marker not followed by a space, e.g. `-item`, `•item`,
/// `3.item`, plus the character after it. `*` is excluded so `**bold**`
/// lines survive.
static PARTIAL_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<bullet>[-+•·]+)|(?P<number>\d+[.)]))(?P<gap>\s*)(?P<next>.)?")
        .expect("partial marker regex")
});

/// Format one trimmed, non-empty section.
pub(crate) fn format_section(section: &str, index: usize) -> String {
    if index == 0 {
        return format_title(section);
    }

    let lines: Vec<&str> = section
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    match lines.as_slice() {
        [] => String::new(),
        [line] => format_single_line(line),
        _ => format_bullets(&lines),
    }
}

// ---------------------------------------------------------------------------
// Rule 1: Title
// ---------------------------------------------------------------------------

/// The leading section becomes an H1 unless it already is a heading.
fn format_title(section: &str) -> String {
    if section.starts_with('#') {
        section.to_string()
    } else {
        format!("# {section}")
    }
}

// ---------------------------------------------------------------------------
// Rule 2: Single line
// ---------------------------------------------------------------------------

/// List items stay as-is; `label: value` lines get a bold label.
fn format_single_line(line: &str) -> String {
    if LIST_ITEM_RE.is_match(line) {
        return line.to_string();
    }

    match line.split_once(':') {
        Some((label, rest)) if !label.trim().is_empty() => {
            let label = label.trim();
            let rest = rest.trim();
            if rest.is_empty() {
                format!("**{label}**:")
            } else {
                format!("**{label}**: {rest}")
            }
        }
        _ => line.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Rule 3: Multiple lines
// ---------------------------------------------------------------------------

/// Every line becomes a list item without doubling existing markers.
fn format_bullets(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| format_bullet(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_bullet(line: &str) -> String {
    if LIST_ITEM_RE.is_match(line) {
        return line.to_string();
    }

    let stripped = strip_partial_marker(line).trim();
    let body = if stripped.is_empty() { line } else { stripped };
    format!("- {body}")
}

/// `line` without its partial marker, if it has one.
///
/// A number is a marker only before whitespace or a letter, so `3.5 kg` and
/// `10.30` stay whole. A `-` or `+` directly before a digit is a sign.
fn strip_partial_marker(line: &str) -> &str {
    let Some(caps) = PARTIAL_MARKER_RE.captures(line) else {
        return line;
    };
    let Some(gap) = caps.name("gap") else {
        return line;
    };
    let spaced = !gap.as_str().is_empty();
    let next = caps.name("next").and_then(|m| m.as_str().chars().next());

    let is_marker = match caps.name("bullet") {
        Some(bullet) => {
            let signed_number = bullet.as_str().ends_with(['-', '+'])
                && next.is_some_and(|c| c.is_ascii_digit());
            spaced || !signed_number
        }
        None => spaced || next.is_some_and(char::is_alphabetic),
    };

    if is_marker { &line[gap.end()..] } else { line }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
