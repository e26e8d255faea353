//! Log setup.
//!
//! The terminal belongs to the UI, so logs go to a file. `RUST_LOG`
//! overrides the configured level.

use crate::config::LoggingConfig;
use crate::error::{DisplayError, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber writing to the configured file.
///
/// # Errors
///
/// Returns [`DisplayError::Logging`] if the file cannot be opened or a
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|e| DisplayError::Logging(format!("{}: {e}", config.file.display())))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| DisplayError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            file: dir.path().join("missing").join("display.log"),
            level: "debug".to_string(),
        };

        let err = init(&config).unwrap_err();
        assert!(matches!(err, DisplayError::Logging(_)));
        assert!(err.to_string().contains("display.log"));
    }
}
