//! Keyword tables and patterns used by the classifier.
//!
//! All patterns run against lower-cased text. Keywords match on word
//! boundaries, so `due` does not fire on `residue`.

use std::sync::LazyLock;

use regex::Regex;

/// Cues that a task is time-critical.
pub(crate) const URGENT_KEYWORDS: &[&str] = &[
    "urgent",
    "asap",
    "immediately",
    "right away",
    "deadline",
    "due",
    "overdue",
    "critical",
    "emergency",
    "blocker",
    "blocking",
    "hotfix",
    "outage",
    "end of day",
    "eod",
    "time-sensitive",
];

/// Cues that a task matters to long-term goals or key relationships.
pub(crate) const IMPORTANT_KEYWORDS: &[&str] = &[
    "important",
    "client",
    "customer",
    "review",
    "goal",
    "strategic",
    "priority",
    "investor",
    "board",
    "revenue",
    "budget",
    "hiring",
    "health",
    "family",
    "planning",
    "plan",
    "contract",
    "launch",
];

/// Cues that someone else can do the task.
pub(crate) const DELEGATE_KEYWORDS: &[&str] = &[
    "delegate",
    "assign",
    "forward",
    "hand off",
    "handoff",
    "outsource",
    "ask someone",
    "have someone",
    "someone else",
    "on behalf",
];

/// Cues that the task can be dropped.
pub(crate) const ELIMINATE_KEYWORDS: &[&str] = &[
    "someday",
    "maybe later",
    "nice to have",
    "optional",
    "ignore",
    "skip",
    "unsubscribe",
    "browse",
    "scroll",
    "social media",
    "procrastinate",
    "waste",
];

pub(crate) static URGENT_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex(URGENT_KEYWORDS));
pub(crate) static IMPORTANT_RE: LazyLock<Regex> =
    LazyLock::new(|| keyword_regex(IMPORTANT_KEYWORDS));
pub(crate) static DELEGATE_RE: LazyLock<Regex> =
    LazyLock::new(|| keyword_regex(DELEGATE_KEYWORDS));
pub(crate) static ELIMINATE_RE: LazyLock<Regex> =
    LazyLock::new(|| keyword_regex(ELIMINATE_KEYWORDS));

/// `in 3 days`, `within 45 minutes`, `in 2 hrs`.
pub(crate) static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:in|within)\s+\d+\s*(?:minutes?|mins?|hours?|hrs?|days?)\b")
        .expect("relative time regex")
});

/// Weekday names and abbreviations plus `today`, `tonight`, `tomorrow`.
///
/// `mon`, `wed`, `sat` and `sun` are also ordinary words, so "sat with the
/// client" reads as urgent. Short forms are kept because task text often
/// says "fri" or "due mon".
pub(crate) static NEAR_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:today|tonight|tomorrow|mon(?:day)?|tue(?:s|sday)?|wed(?:nesday)?|thu(?:r|rs|rsday)?|fri(?:day)?|sat(?:urday)?|sun(?:day)?)\b",
    )
    .expect("near date regex")
});

/// Work that is important even without an explicit importance keyword.
pub(crate) static HIGH_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:report|presentation|research|analysis|strategy|roadmap)s?\b")
        .expect("high value regex")
});

/// Build a word-bounded alternation from a keyword table.
fn keyword_regex(keywords: &[&str]) -> Regex {
    let alternation = keywords
        .iter()
        .map(|kw| regex::escape(kw))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).expect("keyword regex")
}

/// Distinct matches of `re` in `text`, in order of first appearance.
pub(crate) fn matched_keywords(re: &Regex, text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in re.find_iter(text) {
        if !found.iter().any(|f| f == m.as_str()) {
            found.push(m.as_str().to_string());
        }
    }
    found
}
