//! Logging setup
//!
//! Installs a `tracing` subscriber writing to stderr so log lines never mix
//! with rendered replies on stdout.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;

use tracing_subscriber::{fmt, EnvFilter};

use crate::core::{Config, ReplError, Result};

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. Later calls are no-ops.
///
/// `RUST_LOG` takes precedence over the configured filter.
pub fn initialise(config: &Config) -> Result<()> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.log_filter())
            .map_err(|e| ReplError::config(format!("invalid log filter: {}", e)))?,
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ReplError::config(format!("failed to install logger: {}", e)))?;
    let _ = INSTALLED.set(());
    Ok(())
}
