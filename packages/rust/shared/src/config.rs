//! Application configuration for Deskflow.
//!
//! User config lives at `~/.deskflow/deskflow.toml`.
//! Values missing from the file fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DeskflowError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "deskflow.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".deskflow";

/// Default chunk size, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 650;

/// Default overlap between hard-sliced windows, in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 80;

// ---------------------------------------------------------------------------
// Config structs (matching deskflow.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chunking parameters.
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Where the file-backed store keeps workspace state.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// `[chunking]` section.
///
/// Stored unvalidated; `deskflow_chunker::ChunkerConfig` rejects
/// `overlap >= chunk_size` when it is built from these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared by consecutive windows of an oversized paragraph.
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
fn default_overlap() -> usize {
    DEFAULT_CHUNK_OVERLAP
}

/// `[storage]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory; a leading `~/` expands to the home directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "~/.deskflow/data".into()
}

impl StorageConfig {
    /// Resolve `data_dir` to an absolute path, expanding `~/`.
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match self.data_dir.strip_prefix("~/") {
            Some(rest) => {
                let home = dirs::home_dir().ok_or_else(|| {
                    DeskflowError::config("could not determine home directory")
                })?;
                Ok(home.join(rest))
            }
            None => Ok(PathBuf::from(&self.data_dir)),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.deskflow/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DeskflowError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.deskflow/deskflow.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DeskflowError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DeskflowError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DeskflowError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DeskflowError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DeskflowError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
