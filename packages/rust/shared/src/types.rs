//! Core domain types shared by the classifier, chunker, and workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DeskflowError;

/// `source` literal for chunks produced by the chunker.
pub const SOURCE_GENERATED: &str = "generated";

/// `source` literal for imported chunks that did not carry one.
pub const SOURCE_UPLOADED: &str = "uploaded";

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Output of the priority classifier for one task description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub urgent: bool,
    pub important: bool,
    /// Human-readable explanation of which cues fired.
    pub rationale: String,
}

/// One cell of the urgent × important matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// Urgent and important.
    DoFirst,
    /// Important, not urgent.
    Schedule,
    /// Urgent, not important.
    Delegate,
    /// Neither.
    Eliminate,
}

impl Quadrant {
    /// All quadrants in display order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::DoFirst,
        Quadrant::Schedule,
        Quadrant::Delegate,
        Quadrant::Eliminate,
    ];

    pub fn from_axes(urgent: bool, important: bool) -> Self {
        match (urgent, important) {
            (true, true) => Self::DoFirst,
            (false, true) => Self::Schedule,
            (true, false) => Self::Delegate,
            (false, false) => Self::Eliminate,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DoFirst => "Do first",
            Self::Schedule => "Schedule",
            Self::Delegate => "Delegate",
            Self::Eliminate => "Eliminate",
        }
    }
}

impl From<&ClassificationResult> for Quadrant {
    fn from(result: &ClassificationResult) -> Self {
        Self::from_axes(result.urgent, result.important)
    }
}

// ---------------------------------------------------------------------------
// Chunk
// ---------------------------------------------------------------------------

/// A bounded slice of source text plus provenance metadata.
///
/// Serialized field names are camelCase so exported files keep the
/// `{ id, content, metadata: { chunkIndex, createdAt, ... } }` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Opaque unique identifier.
    pub id: String,
    pub content: String,
    pub metadata: ChunkMetadata,
}

/// Per-chunk metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Position within the chunk set (contiguous, 0-based).
    pub chunk_index: usize,
    /// Shared by every chunk created in the same batch.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub source: String,
    /// Approximate token count, always at least 1.
    pub token_estimate: u64,
    /// Display/change-detection hash of `content`. Not cryptographic.
    pub hash: String,
}

/// Serialization format for chunk exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON array.
    Json,
    /// One compact JSON object per line.
    Jsonl,
}

impl ExportFormat {
    /// Conventional file extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Jsonl => "jsonl",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = DeskflowError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" => Ok(Self::Jsonl),
            other => Err(DeskflowError::validation(format!(
                "unknown export format '{other}' (expected json or jsonl)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Timestamp encoding
// ---------------------------------------------------------------------------

/// RFC 3339 timestamps in UTC with millisecond precision and a `Z` suffix,
/// e.g. `2026-03-01T09:30:00.000Z`.
///
/// Parsing accepts any RFC 3339 spelling but keeps only the instant, cut to
/// milliseconds. A value read as `2026-03-01T11:30:00.123456+02:00` is
/// written back as `2026-03-01T09:30:00.123Z`.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Render a timestamp in the export format.
    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Parse any RFC 3339 timestamp, normalizing it to UTC milliseconds.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|ts| ts.with_timezone(&Utc).trunc_subsecs(3))
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}
