//! Tracing subscriber setup for host applications.
//!
//! Library code only emits `tracing` events; the embedding application calls
//! [`init_tracing`] once at startup.

use tracing_subscriber::{EnvFilter, fmt};

use deskflow_shared::{DeskflowError, Result};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install a global subscriber. `RUST_LOG` overrides the verbosity level.
///
/// Verbosity 0 is `info`, 1 is `debug`, 2 or more is `trace`.
pub fn init_tracing(verbosity: u8, format: LogFormat) -> Result<()> {
    let filter = match verbosity {
        0 => "deskflow=info",
        1 => "deskflow=debug",
        _ => "deskflow=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let installed = match format {
        LogFormat::Text => fmt().with_env_filter(env_filter).with_target(false).try_init(),
        LogFormat::Json => fmt().json().with_env_filter(env_filter).try_init(),
    };

    installed.map_err(|e| DeskflowError::config(format!("failed to install tracing subscriber: {e}")))
}
