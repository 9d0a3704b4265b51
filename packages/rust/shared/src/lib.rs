//! Shared types, error model, and configuration for Deskflow.
//!
//! This crate is the foundation depended on by all other Deskflow crates.
//! It provides:
//! - [`DeskflowError`] — the unified error type
//! - Domain types ([`ClassificationResult`], [`Quadrant`], [`Chunk`], [`ExportFormat`])
//! - Injected capabilities ([`Clock`], [`IdGenerator`])
//! - Configuration ([`AppConfig`], config loading)

pub mod capabilities;
pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use capabilities::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidIds};
pub use config::{
    AppConfig, ChunkingConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, StorageConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{DeskflowError, Result};
pub use types::{
    Chunk, ChunkMetadata, ClassificationResult, ExportFormat, Quadrant, SOURCE_GENERATED,
    SOURCE_UPLOADED, timestamp,
};
