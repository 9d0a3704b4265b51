//! Key-value persistence adapters for workspace state.
//!
//! The workspace calls [`KeyValueStore::load`] once per key at startup and
//! [`KeyValueStore::save`] after every change. Values are JSON strings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use deskflow_shared::{DeskflowError, Result};

/// Storage key for the task list.
pub const TASKS_KEY: &str = "deskflow.tasks";

/// Storage key for the notes text.
pub const NOTES_KEY: &str = "deskflow.notes";

/// Storage key for the knowledge text and its chunk set.
pub const KNOWLEDGE_KEY: &str = "deskflow.knowledge";

/// Minimal persistence capability injected into the workspace.
pub trait KeyValueStore {
    /// Read the value for `key`, or `None` if it was never saved.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value for `key`.
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key under a data directory.
///
/// Writes go to a hidden temp file first and are renamed into place, so a
/// crash mid-write never leaves a truncated value behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| DeskflowError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(DeskflowError::Storage(format!("invalid storage key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DeskflowError::io(path, e)),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let target = self.path_for(key)?;
        let temp = self.dir.join(format!(".{key}.json.tmp"));

        std::fs::write(&temp, value).map_err(|e| DeskflowError::io(&temp, e))?;
        std::fs::rename(&temp, &target).map_err(|e| DeskflowError::io(&target, e))?;

        debug!(path = %target.display(), bytes = value.len(), "value saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
