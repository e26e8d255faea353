//! Configuration system for the display client.
//!
//! Supports YAML configuration with precedence: CLI > file > defaults.
//! Every field is optional in the file; missing values take the defaults
//! below.

use crate::error::{DisplayError, Result};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Serial link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Port identifier. Overridden by the CLI positional argument.
    #[serde(default = "default_port")]
    pub port: String,

    /// Baud rate the controller sketch is flashed with.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Read timeout on the open port, in milliseconds.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Delay after opening the port, in milliseconds. Most boards reset
    /// when the port is opened and drop bytes until their bootloader exits.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Sleep between availability checks and after I/O errors, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Longest partial line kept before the decoder discards and resyncs.
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
}

/// Returns the platform placeholder port used when none is given.
#[must_use]
pub fn default_port() -> String {
    if cfg!(target_os = "windows") {
        "COM3".to_string()
    } else if cfg!(target_os = "macos") {
        "/dev/tty.usbmodem1101".to_string()
    } else {
        "/dev/ttyACM0".to_string()
    }
}
fn default_baud_rate() -> u32 {
    115_200
}
fn default_read_timeout_ms() -> u64 {
    100
}
fn default_settle_ms() -> u64 {
    2000
}
fn default_poll_interval_ms() -> u64 {
    100
}
fn default_max_line_bytes() -> usize {
    4096
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout_ms(),
            settle_ms: default_settle_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            max_line_bytes: default_max_line_bytes(),
        }
    }
}

/// Render loop and board geometry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Render loop iterations per second.
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,

    /// Board width in game cells.
    #[serde(default = "default_grid_width")]
    pub grid_width: u16,

    /// Board height in game cells.
    #[serde(default = "default_grid_height")]
    pub grid_height: u16,
}

fn default_target_fps() -> u32 {
    60
}
fn default_grid_width() -> u16 {
    40
}
fn default_grid_height() -> u16 {
    20
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
            grid_width: default_grid_width(),
            grid_height: default_grid_height(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log file path. The terminal belongs to the TUI, so logs go here.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("snake-display.log")
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { file: default_log_file(), level: default_log_level() }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Serial link settings.
    #[serde(default)]
    pub serial: SerialConfig,

    /// Display settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Palette.
    #[serde(default)]
    pub theme: Theme,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            serial: SerialConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location: `<config_dir>/snake-display/config.yaml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("snake-display").join("config.yaml"))
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| DisplayError::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses and validates configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            DisplayError::ConfigParse { line, message: e.to_string() }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would stall or break the render loop or decoder.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::ConfigInvalid`] naming the first bad key.
    pub fn validate(&self) -> Result<()> {
        let invalid = |key: &str, message: &str| {
            Err(DisplayError::ConfigInvalid { key: key.to_string(), message: message.to_string() })
        };

        if self.serial.baud_rate == 0 {
            return invalid("serial.baud_rate", "must be positive");
        }
        if self.serial.max_line_bytes == 0 {
            return invalid("serial.max_line_bytes", "must be positive");
        }
        if self.serial.poll_interval_ms == 0 {
            return invalid("serial.poll_interval_ms", "must be positive");
        }
        if self.display.target_fps == 0 {
            return invalid("display.target_fps", "must be positive");
        }
        if self.display.grid_width == 0 || self.display.grid_height == 0 {
            return invalid("display.grid_width", "grid dimensions must be positive");
        }
        Ok(())
    }

    /// Loads configuration with fallback to defaults.
    ///
    /// A missing file is silent; an unreadable or invalid one is reported on
    /// the returned warning so the caller can log it once logging is up.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<DisplayError>) {
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(DisplayError::ConfigNotFound(_)) => (Self::default(), None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Applies the CLI port override.
    #[must_use]
    pub fn with_port(mut self, port: Option<String>) -> Self {
        if let Some(port) = port {
            self.serial.port = port;
        }
        self
    }

    /// Duration of one render loop iteration.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.display.target_fps.max(1)
    }

    /// Worker sleep between empty availability checks.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.serial.poll_interval_ms)
    }

    /// Read timeout applied to the open port.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.serial.read_timeout_ms)
    }

    /// Delay after opening the port.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.serial.settle_ms)
    }
}
