//! Error types for the display client.
//!
//! [`DisplayError`] covers startup and terminal failures. [`RecordError`]
//! describes why a single wire record was rejected; it never escapes the
//! ingestion worker, which counts and discards such records.

use std::io;
use thiserror::Error;

/// Error type for display client operations.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The serial port could not be opened.
    #[error("failed to open serial port '{port}': {message}")]
    SerialOpen {
        /// Port identifier that was requested.
        port: String,
        /// Error message reported by the OS serial layer.
        message: String,
    },

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    ConfigInvalid {
        /// The configuration key with invalid value.
        key: String,
        /// Error message describing why the value is invalid.
        message: String,
    },

    /// Terminal initialization or rendering error.
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// The log subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// The ingestion thread could not be started.
    #[error("failed to start ingestion worker: {0}")]
    WorkerSpawn(io::Error),
}

/// Result type alias for display client operations.
pub type Result<T> = std::result::Result<T, DisplayError>;

/// Reason a structured record was rejected by the state parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The record is not syntactically valid JSON, or a field has the wrong type.
    #[error("malformed record: {0}")]
    Malformed(String),

    /// The `state` field names no known variant.
    #[error("unknown state {0}")]
    UnknownState(i64),

    /// A field required by the declared state is absent.
    #[error("state {state} requires field '{field}'")]
    MissingField {
        /// Variant name of the declared state.
        state: &'static str,
        /// Wire name of the absent field.
        field: &'static str,
    },

    /// A field is present but its value is out of range.
    #[error("invalid value for '{field}': {message}")]
    InvalidField {
        /// Wire name of the offending field.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_error_includes_line_number() {
        let err = DisplayError::ConfigParse { line: 42, message: "invalid value".to_string() };
        let display = err.to_string();

        assert!(display.contains("42"), "Error should include line number: {}", display);
        assert!(display.contains("invalid value"), "Error should include message: {}", display);
    }

    #[test]
    fn test_serial_open_includes_port() {
        let err = DisplayError::SerialOpen {
            port: "/dev/ttyACM0".to_string(),
            message: "No such file or directory".to_string(),
        };
        let display = err.to_string();

        assert!(display.contains("/dev/ttyACM0"), "Error should include port: {}", display);
        assert!(display.contains("No such file"), "Error should include cause: {}", display);
    }

    #[test]
    fn test_config_invalid_includes_key() {
        let err = DisplayError::ConfigInvalid {
            key: "display.target_fps".to_string(),
            message: "must be positive".to_string(),
        };
        assert!(err.to_string().contains("display.target_fps"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "tty gone");
        let err: DisplayError = io_err.into();

        assert!(matches!(err, DisplayError::Terminal(_)), "Should convert to Terminal");
        assert!(err.to_string().contains("tty gone"));
    }

    #[test]
    fn test_worker_spawn_is_not_a_terminal_error() {
        let err = DisplayError::WorkerSpawn(io::Error::new(io::ErrorKind::OutOfMemory, "no threads"));
        assert!(err.to_string().starts_with("failed to start ingestion worker"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DisplayError>();
        assert_send_sync::<RecordError>();
    }

    #[test]
    fn test_missing_field_names_state_and_field() {
        let err = RecordError::MissingField { state: "Playing", field: "snake" };
        let display = err.to_string();

        assert!(display.contains("Playing"));
        assert!(display.contains("snake"));
    }

    #[test]
    fn test_unknown_state_display() {
        assert_eq!(RecordError::UnknownState(9).to_string(), "unknown state 9");
    }
}
