//! Rule-based priority classifier.
//!
//! Assigns urgency and importance to a free-text task description and
//! explains which cues fired. Evaluation order:
//! 1. Urgent keywords, relative-time phrases, and near-term dates set `urgent`
//! 2. Important keywords set `important`
//! 3. High-value work (reports, research, roadmaps...) sets `important` when nothing else did
//! 4. Delegation cues clear `important`
//! 5. Elimination cues clear both axes, overriding everything above

mod rules;

use tracing::debug;

use deskflow_shared::ClassificationResult;

use rules::{
    DELEGATE_RE, ELIMINATE_RE, HIGH_VALUE_RE, IMPORTANT_RE, NEAR_DATE_RE, RELATIVE_TIME_RE,
    URGENT_RE, matched_keywords,
};

/// Rationale used when no cue matched.
pub const DEFAULT_RATIONALE: &str = "Default review classification";

/// Separator between rationale fragments.
pub const RATIONALE_SEPARATOR: &str = " · ";

/// Classify a task description.
///
/// Callers trim and reject empty input first; any string still yields a
/// result.
pub fn classify(text: &str) -> ClassificationResult {
    let lower = text.to_lowercase();

    let urgent_hits = matched_keywords(&URGENT_RE, &lower);
    let important_hits = matched_keywords(&IMPORTANT_RE, &lower);
    let delegate_hits = matched_keywords(&DELEGATE_RE, &lower);
    let eliminate_hits = matched_keywords(&ELIMINATE_RE, &lower);
    let time_hit = RELATIVE_TIME_RE.find(&lower).map(|m| m.as_str().to_string());
    let date_hit = NEAR_DATE_RE.find(&lower).map(|m| m.as_str().to_string());

    let mut urgent = !urgent_hits.is_empty() || time_hit.is_some() || date_hit.is_some();
    let mut important = !important_hits.is_empty();

    if !important && HIGH_VALUE_RE.is_match(&lower) {
        important = true;
    }

    if !delegate_hits.is_empty() {
        important = false;
    }

    if !eliminate_hits.is_empty() {
        urgent = false;
        important = false;
    }

    let mut fragments: Vec<String> = Vec::new();

    // Only the strongest urgency signal is reported.
    if !urgent_hits.is_empty() {
        fragments.push(format!("Urgent keywords: {}", urgent_hits.join(", ")));
    } else if let Some(hit) = &time_hit {
        fragments.push(format!("Time-sensitive: {hit}"));
    } else if let Some(hit) = &date_hit {
        fragments.push(format!("Near-term date: {hit}"));
    }

    if !important_hits.is_empty() {
        fragments.push(format!("Important keywords: {}", important_hits.join(", ")));
    }
    if !delegate_hits.is_empty() {
        fragments.push(format!("Delegation cue: {}", delegate_hits.join(", ")));
    }
    if !eliminate_hits.is_empty() {
        fragments.push(format!("Low-value cue: {}", eliminate_hits.join(", ")));
    }

    let rationale = if fragments.is_empty() {
        DEFAULT_RATIONALE.to_string()
    } else {
        fragments.join(RATIONALE_SEPARATOR)
    };

    debug!(urgent, important, fragments = fragments.len(), "task classified");

    ClassificationResult {
        urgent,
        important,
        rationale,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
