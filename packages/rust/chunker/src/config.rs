//! Validated chunking parameters.

use deskflow_shared::{
    ChunkingConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DeskflowError, Result,
};

/// Chunk size and window overlap, both in characters.
///
/// Invariant: `0 < chunk_size` and `overlap < chunk_size`, so the window
/// step `chunk_size - overlap` is always positive. The fields are private and
/// the only constructors validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    chunk_size: usize,
    overlap: usize,
}

impl ChunkerConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DeskflowError::validation("chunk_size must be greater than zero"));
        }
        if overlap >= chunk_size {
            return Err(DeskflowError::validation(format!(
                "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between the starts of consecutive windows. Always positive.
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl TryFrom<&ChunkingConfig> for ChunkerConfig {
    type Error = DeskflowError;

    fn try_from(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.overlap)
            .map_err(|e| DeskflowError::config(format!("[chunking] {e}")))
    }
}
