//! Paragraph-boundary splitting into raw chunk strings.
//!
//! # Algorithm
//!
//! 1. Normalize `\r\n` to `\n` and trim; empty text yields no pieces.
//! 2. Split on runs of two or more newlines into trimmed, non-empty paragraphs.
//! 3. Accumulate paragraphs (joined by `\n\n`) while the buffer stays within
//!    `chunk_size` characters; otherwise flush it and start a new one.
//! 4. A paragraph longer than `chunk_size` flushes the buffer and is cut into
//!    `chunk_size` windows advancing by `chunk_size - overlap`. Its tail is
//!    never merged with the next paragraph.
//! 5. Flush the trailing buffer.
//! 6. If nothing was produced, return the whole normalized text as one piece.
//!
//! Lengths are counted in `char`s, so windows never split a code point.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::config::ChunkerConfig;

/// Two or more consecutive newlines.
static PARAGRAPH_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("paragraph break regex"));

const PARAGRAPH_JOIN: &str = "\n\n";

/// Split `text` into raw chunk strings.
pub fn split_text(text: &str, config: &ChunkerConfig) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return Vec::new();
    }

    let size = config.chunk_size();
    let mut pieces: Vec<String> = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0usize;

    for paragraph in PARAGRAPH_BREAK_RE
        .split(normalized)
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        let para_len = paragraph.chars().count();
        let candidate_len = if buffer.is_empty() {
            para_len
        } else {
            buffer_len + PARAGRAPH_JOIN.len() + para_len
        };

        if candidate_len <= size {
            if !buffer.is_empty() {
                buffer.push_str(PARAGRAPH_JOIN);
            }
            buffer.push_str(paragraph);
            buffer_len = candidate_len;
            continue;
        }

        if !buffer.is_empty() {
            pieces.push(std::mem::take(&mut buffer));
            buffer_len = 0;
        }

        if para_len <= size {
            buffer.push_str(paragraph);
            buffer_len = para_len;
        } else {
            slice_windows(paragraph, config, &mut pieces);
        }
    }

    if !buffer.is_empty() {
        pieces.push(buffer);
    }

    if pieces.is_empty() {
        warn!("paragraph split produced no chunks, keeping whole text");
        pieces.push(normalized.to_string());
    }

    pieces
}

/// Cut an oversized paragraph into overlapping fixed-size windows.
fn slice_windows(paragraph: &str, config: &ChunkerConfig, out: &mut Vec<String>) {
    let chars: Vec<char> = paragraph.chars().collect();
    let size = config.chunk_size();
    let step = config.step();

    let mut start = 0;
    while start < chars.len() {
        let end = (start + size).min(chars.len());
        out.push(chars[start..end].iter().collect());
        start += step;
    }
}
