//! Caller-side composition for Deskflow.
//!
//! This crate owns all mutable state that the pure text components never
//! touch: the task board, notes, and knowledge chunks ([`Workspace`]), plus
//! the persistence adapters it writes through ([`store`]).

pub mod store;
pub mod telemetry;
pub mod workspace;

pub use store::{FileStore, KNOWLEDGE_KEY, KeyValueStore, MemoryStore, NOTES_KEY, TASKS_KEY};
pub use telemetry::{LogFormat, init_tracing};
pub use workspace::{Knowledge, TaskItem, Workspace, WorkspaceSummary};

use deskflow_chunker::ChunkerConfig;
use deskflow_shared::{AppConfig, Result};

/// Open a file-backed workspace from application config.
///
/// Validates the `[chunking]` section and opens the store under
/// `[storage] data_dir`.
pub fn open_workspace(config: &AppConfig) -> Result<Workspace<FileStore>> {
    let chunker_config = ChunkerConfig::try_from(&config.chunking)?;
    let store = FileStore::open(config.storage.resolved_data_dir()?)?;
    Workspace::load(store, chunker_config)
}
