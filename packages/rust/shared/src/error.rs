//! Error types for Deskflow.
//!
//! Every library crate returns [`DeskflowError`] via `thiserror`. The
//! classifier and normalizer are total and never produce one.

use std::path::PathBuf;

/// Top-level error type for all Deskflow operations.
#[derive(Debug, thiserror::Error)]
pub enum DeskflowError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Data validation error (invalid chunker settings, empty task text, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Structured import data that could not be decoded.
    ///
    /// Imports are all-or-nothing: when this is returned, no chunk from the
    /// payload was accepted.
    #[error("malformed input at {location}: {message}")]
    MalformedInput { location: String, message: String },

    /// Persistence adapter error, including corrupt stored state.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DeskflowError>;

impl DeskflowError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a malformed-input error for a location such as `line 3`.
    pub fn malformed(location: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::MalformedInput {
            location: location.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from decoding imported data.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }
}
