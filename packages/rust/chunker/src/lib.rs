//! Paragraph-aware chunking and chunk-set serialization.
//!
//! This crate provides:
//! - [`Chunker`] — splits text into bounded, overlap-preserving [`Chunk`]s
//! - [`ChunkerConfig`] — validated size/overlap settings
//! - [`serialize`] / [`parse`] — JSON and JSONL export and import
//!
//! # Example
//!
//! ```rust
//! use deskflow_chunker::{ChunkerConfig, chunk_text};
//!
//! let chunks = chunk_text("Hello world.\n\nSecond paragraph.", &ChunkerConfig::default());
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].metadata.chunk_index, 0);
//! ```

pub mod codec;
pub mod config;
pub mod fingerprint;
pub mod split;

use std::sync::Arc;

use tracing::{debug, instrument};

use deskflow_shared::{
    Chunk, ChunkMetadata, Clock, IdGenerator, SOURCE_GENERATED, SystemClock, UuidIds,
};

pub use codec::{ParsedChunks, parse, parse_with, serialize};
pub use config::ChunkerConfig;
pub use fingerprint::{content_hash, token_estimate};
pub use split::split_text;

/// Turns text into annotated chunk sets.
///
/// Holds a validated config plus the clock and id capabilities used to stamp
/// each batch.
#[derive(Clone)]
pub struct Chunker {
    config: ChunkerConfig,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Chunker {
    /// Chunker using the system clock and UUID v7 ids.
    pub fn new(config: ChunkerConfig) -> Self {
        Self::with_capabilities(config, Arc::new(SystemClock), Arc::new(UuidIds))
    }

    pub fn with_capabilities(
        config: ChunkerConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { config, clock, ids }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk `text` into a fresh chunk set.
    ///
    /// Every chunk in the batch shares one `createdAt`. Indices are
    /// contiguous from 0. Empty text yields an empty set.
    #[instrument(skip_all, fields(chars = text.len(), chunk_size = self.config.chunk_size()))]
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let pieces = split_text(text, &self.config);
        let created_at = self.clock.now();

        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .enumerate()
            .map(|(index, content)| Chunk {
                id: self.ids.next_id(),
                metadata: ChunkMetadata {
                    chunk_index: index,
                    created_at,
                    source: SOURCE_GENERATED.to_string(),
                    token_estimate: token_estimate(&content),
                    hash: content_hash(&content),
                },
                content,
            })
            .collect();

        debug!(chunks = chunks.len(), "text chunked");
        chunks
    }
}

impl std::fmt::Debug for Chunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(ChunkerConfig::default())
    }
}

/// Chunk `text` with the system clock and UUID ids.
pub fn chunk_text(text: &str, config: &ChunkerConfig) -> Vec<Chunk> {
    Chunker::new(*config).chunk(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
