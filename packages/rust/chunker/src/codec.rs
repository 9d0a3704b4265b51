//! JSON / JSONL export and import of chunk sets.
//!
//! Export writes the canonical [`Chunk`] shape. Import accepts loosely shaped
//! records: every field is optional and missing ones are filled in as
//! follows.
//!
//! | field | default |
//! |---|---|
//! | `id` | fresh id from the [`IdGenerator`] |
//! | `content` | `""` |
//! | `metadata.chunkIndex` | position in the input |
//! | `metadata.createdAt` | one "now" per import |
//! | `metadata.source` | `"uploaded"` |
//! | `metadata.tokenEstimate` | recomputed from content |
//! | `metadata.hash` | recomputed from content |
//!
//! A present `tokenEstimate` must be positive. A present `createdAt` must be
//! RFC 3339; it is kept as an instant in UTC milliseconds, so re-exporting
//! rewrites `...00Z` or `+02:00` forms as `...00.000Z`.
//!
//! Import is all-or-nothing: the first bad element or line fails the whole
//! parse.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

use deskflow_shared::{
    Chunk, ChunkMetadata, Clock, DeskflowError, ExportFormat, IdGenerator, Result,
    SOURCE_UPLOADED, SystemClock, UuidIds, timestamp,
};

use crate::fingerprint::{content_hash, token_estimate};

/// Separator used to rebuild the source text from imported chunks.
const CONTENT_JOIN: &str = "\n\n";

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChunks {
    /// Chunk contents joined by blank lines.
    pub content: String,
    pub chunks: Vec<Chunk>,
}

// ---------------------------------------------------------------------------
// Partial records
// ---------------------------------------------------------------------------

/// An imported chunk before defaults are applied.
#[derive(Debug, Default, Deserialize)]
struct ChunkRecord {
    id: Option<String>,
    content: Option<String>,
    metadata: Option<MetadataRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataRecord {
    chunk_index: Option<usize>,
    created_at: Option<String>,
    source: Option<String>,
    token_estimate: Option<u64>,
    hash: Option<String>,
}

impl ChunkRecord {
    /// Apply the default-fill rules. Fails on an unparseable timestamp or a
    /// zero token estimate.
    fn into_chunk(
        self,
        position: usize,
        location: &str,
        now: DateTime<Utc>,
        ids: &dyn IdGenerator,
    ) -> Result<Chunk> {
        let content = self.content.unwrap_or_default();
        let meta = self.metadata.unwrap_or_default();

        let created_at = match meta.created_at {
            Some(raw) => timestamp::parse(&raw).ok_or_else(|| {
                DeskflowError::malformed(location, format!("invalid createdAt '{raw}'"))
            })?,
            None => now,
        };

        let estimate = match meta.token_estimate {
            Some(0) => {
                return Err(DeskflowError::malformed(
                    location,
                    "tokenEstimate must be positive",
                ));
            }
            Some(n) => n,
            None => token_estimate(&content),
        };

        Ok(Chunk {
            id: self.id.unwrap_or_else(|| ids.next_id()),
            metadata: ChunkMetadata {
                chunk_index: meta.chunk_index.unwrap_or(position),
                created_at,
                source: meta.source.unwrap_or_else(|| SOURCE_UPLOADED.to_string()),
                token_estimate: estimate,
                hash: meta.hash.unwrap_or_else(|| content_hash(&content)),
            },
            content,
        })
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Serialize a chunk set.
///
/// `Json` is a pretty-printed array (two-space indent); `Jsonl` is one
/// compact object per line, joined by `\n` with no trailing newline.
pub fn serialize(chunks: &[Chunk], format: ExportFormat) -> Result<String> {
    let encoded = match format {
        ExportFormat::Json => serde_json::to_string_pretty(chunks)
            .map_err(|e| DeskflowError::validation(format!("failed to encode chunks: {e}")))?,
        ExportFormat::Jsonl => chunks
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| DeskflowError::validation(format!("failed to encode chunks: {e}")))?
            .join("\n"),
    };

    debug!(chunks = chunks.len(), %format, bytes = encoded.len(), "chunks serialized");
    Ok(encoded)
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Parse an exported payload using the system clock and UUID ids for
/// defaults.
pub fn parse(raw: &str) -> Result<ParsedChunks> {
    parse_with(raw, &SystemClock, &UuidIds)
}

/// Parse a JSON array or JSONL payload.
///
/// Input whose first non-whitespace character is `[` is read as a JSON
/// array; anything else is read as one object per line, skipping blank
/// lines.
#[instrument(skip_all, fields(bytes = raw.len()))]
pub fn parse_with(raw: &str, clock: &dyn Clock, ids: &dyn IdGenerator) -> Result<ParsedChunks> {
    let now = clock.now();

    let chunks = if raw.trim_start().starts_with('[') {
        parse_array(raw, now, ids)?
    } else {
        parse_lines(raw, now, ids)?
    };

    let content = chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join(CONTENT_JOIN);

    debug!(chunks = chunks.len(), "chunk payload parsed");
    Ok(ParsedChunks { content, chunks })
}

fn parse_array(raw: &str, now: DateTime<Utc>, ids: &dyn IdGenerator) -> Result<Vec<Chunk>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw).map_err(|e| {
        DeskflowError::malformed(format!("line {} column {}", e.line(), e.column()), e.to_string())
    })?;

    values
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            let location = format!("element {position}");
            let record = ChunkRecord::deserialize(value)
                .map_err(|e| DeskflowError::malformed(&location, e.to_string()))?;
            record.into_chunk(position, &location, now, ids)
        })
        .collect()
}

fn parse_lines(raw: &str, now: DateTime<Utc>, ids: &dyn IdGenerator) -> Result<Vec<Chunk>> {
    let mut chunks = Vec::new();

    for (line_no, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let location = format!("line {}", line_no + 1);
        let record: ChunkRecord = serde_json::from_str(line)
            .map_err(|e| DeskflowError::malformed(&location, e.to_string()))?;
        let position = chunks.len();
        chunks.push(record.into_chunk(position, &location, now, ids)?);
    }

    Ok(chunks)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use deskflow_shared::{FixedClock, SequentialIds};

    use crate::{Chunker, ChunkerConfig};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap())
    }

    fn sample_chunks() -> Vec<Chunk> {
        let chunker = Chunker::with_capabilities(
            ChunkerConfig::new(40, 5).unwrap(),
            std::sync::Arc::new(clock()),
            std::sync::Arc::new(SequentialIds::new("c")),
        );
        chunker.chunk(
            "Quarterly planning notes.\n\nBudget review with finance.\n\nHiring plan for the platform team is still open.",
        )
    }

    #[test]
    fn json_roundtrip_preserves_every_field() {
        let chunks = sample_chunks();
        assert!(chunks.len() > 1);

        let json = serialize(&chunks, ExportFormat::Json).unwrap();
        let parsed = parse_with(&json, &clock(), &SequentialIds::new("other")).unwrap();
        assert_eq!(parsed.chunks, chunks);
    }

    #[test]
    fn jsonl_roundtrip_preserves_every_field() {
        let chunks = sample_chunks();
        let jsonl = serialize(&chunks, ExportFormat::Jsonl).unwrap();
        assert_eq!(jsonl.lines().count(), chunks.len());
        assert!(!jsonl.ends_with('\n'));

        let parsed = parse_with(&jsonl, &clock(), &SequentialIds::new("other")).unwrap();
        assert_eq!(parsed.chunks, chunks);
    }

    #[test]
    fn json_export_is_pretty_printed_camel_case() {
        let json = serialize(&sample_chunks()[..1], ExportFormat::Json).unwrap();
        assert!(json.starts_with("[\n  {\n    \"id\": \"c-0\""));
        assert!(json.contains("\"chunkIndex\": 0"));
        assert!(json.contains("\"createdAt\": \"2026-03-01T09:30:00.000Z\""));
        assert!(json.contains("\"source\": \"generated\""));
    }

    #[test]
    fn empty_set_serializes() {
        assert_eq!(serialize(&[], ExportFormat::Json).unwrap(), "[]");
        assert_eq!(serialize(&[], ExportFormat::Jsonl).unwrap(), "");
    }

    #[test]
    fn joined_content_uses_blank_lines() {
        let raw = "{\"content\":\"alpha\"}\n{\"content\":\"beta\"}";
        let parsed = parse_with(raw, &clock(), &SequentialIds::new("u")).unwrap();
        assert_eq!(parsed.content, "alpha\n\nbeta");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let raw = "\n{\"content\":\"one two\"}\n\n{}\n";
        let parsed = parse_with(raw, &clock(), &SequentialIds::new("u")).unwrap();
        assert_eq!(parsed.chunks.len(), 2);

        let first = &parsed.chunks[0];
        assert_eq!(first.id, "u-0");
        assert_eq!(first.content, "one two");
        assert_eq!(first.metadata.chunk_index, 0);
        assert_eq!(first.metadata.created_at, clock().0);
        assert_eq!(first.metadata.source, SOURCE_UPLOADED);
        assert_eq!(first.metadata.token_estimate, 3);
        assert_eq!(first.metadata.hash, content_hash("one two"));

        let second = &parsed.chunks[1];
        assert_eq!(second.id, "u-1");
        assert_eq!(second.content, "");
        assert_eq!(second.metadata.chunk_index, 1);
        assert_eq!(second.metadata.token_estimate, 1);
    }

    #[test]
    fn present_fields_are_kept() {
        let raw = r#"[{"id":"keep","content":"x","metadata":{"chunkIndex":7,"source":"notes"}}]"#;
        let parsed = parse_with(raw, &clock(), &SequentialIds::new("u")).unwrap();
        let chunk = &parsed.chunks[0];
        assert_eq!(chunk.id, "keep");
        assert_eq!(chunk.metadata.chunk_index, 7);
        assert_eq!(chunk.metadata.source, "notes");
    }

    #[test]
    fn object_start_is_read_as_jsonl() {
        let raw = "{\"content\":\"a\"}";
        let parsed = parse_with(raw, &clock(), &SequentialIds::new("u")).unwrap();
        assert_eq!(parsed.chunks.len(), 1);
    }

    #[test]
    fn invalid_text_is_malformed() {
        let err = parse("not valid json").unwrap_err();
        assert!(err.is_malformed_input());
        assert!(err.to_string().starts_with("malformed input at line 1"));
    }

    #[test]
    fn bad_line_fails_whole_import() {
        let raw = "{\"content\":\"a\"}\n{\"content\":\"b\"\n{\"content\":\"c\"}";
        let err = parse_with(raw, &clock(), &SequentialIds::new("u")).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn bad_array_element_is_located() {
        let raw = r#"[{"content":"a"}, 42]"#;
        let err = parse_with(raw, &clock(), &SequentialIds::new("u")).unwrap_err();
        assert!(err.to_string().starts_with("malformed input at element 1"));
    }

    #[test]
    fn truncated_array_is_malformed() {
        let err = parse("[{\"content\":\"a\"},").unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let raw = r#"{"content":"a","metadata":{"chunkIndex":"first"}}"#;
        let err = parse_with(raw, &clock(), &SequentialIds::new("u")).unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn invalid_timestamp_is_malformed() {
        let raw = r#"{"content":"a","metadata":{"createdAt":"yesterday"}}"#;
        let err = parse_with(raw, &clock(), &SequentialIds::new("u")).unwrap_err();
        assert!(err.to_string().contains("invalid createdAt 'yesterday'"));
    }

    #[test]
    fn zero_token_estimate_is_malformed() {
        let raw = "{\"content\":\"a\"}\n{\"content\":\"a b c\",\"metadata\":{\"tokenEstimate\":0}}";
        let err = parse_with(raw, &clock(), &SequentialIds::new("u")).unwrap_err();
        assert!(err.is_malformed_input());
        assert_eq!(
            err.to_string(),
            "malformed input at line 2: tokenEstimate must be positive"
        );
    }

    #[test]
    fn imported_timestamps_export_in_canonical_form() {
        let raw = r#"{"content":"a","metadata":{"createdAt":"2026-03-01T11:30:00+02:00"}}"#;
        let parsed = parse_with(raw, &clock(), &SequentialIds::new("u")).unwrap();
        assert_eq!(parsed.chunks[0].metadata.created_at, clock().0);

        let jsonl = serialize(&parsed.chunks, ExportFormat::Jsonl).unwrap();
        assert!(jsonl.contains("\"createdAt\":\"2026-03-01T09:30:00.000Z\""));
    }

    #[test]
    fn fixture_imports() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/chunks.fixture.json")
            .expect("read fixture");
        let parsed = parse(&fixture).expect("parse fixture");
        assert_eq!(parsed.chunks.len(), 2);
        for chunk in &parsed.chunks {
            assert_eq!(chunk.metadata.hash, content_hash(&chunk.content));
            assert_eq!(chunk.metadata.token_estimate, token_estimate(&chunk.content));
        }
        assert!(parsed.content.contains("\n\n"));
    }
}
