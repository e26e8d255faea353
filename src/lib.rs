//! # Snake Display
//!
//! Terminal display client for a microcontroller snake game.
//!
//! The controller streams newline-delimited JSON state records over a serial
//! link, interleaved with free-text diagnostics. This crate reads that
//! stream on a worker thread, hands decoded snapshots to a fixed-rate render
//! loop through a queue, and draws the game with ratatui. Key presses go back
//! to the controller as single command bytes.
//!
//! ## Pipeline
//!
//! ```text
//! serial bytes ─▶ LineDecoder ─▶ parse_record ─▶ transfer queue ─▶ DisplayState ─▶ ui::draw
//!                                                                  keys ─▶ CommandSink ─▶ serial
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snake_display::prelude::*;
//!
//! let config = Config::default().with_port(Some("/dev/ttyACM0".to_string()));
//! let pipeline = Pipeline::connect(&config)?;
//! let mut app = App::new(config, pipeline);
//! app.run()?;
//! # Ok::<(), snake_display::error::DisplayError>(())
//! ```

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in terminal drawing code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Wire Protocol
// ============================================================================

/// Line framing, record parsing and outbound commands.
pub mod protocol;

// ============================================================================
// Pipeline
// ============================================================================

/// Serial port access.
pub mod serial;

/// Worker thread turning serial bytes into snapshots.
pub mod ingest;

/// Hand-off queue between the worker and the render loop.
pub mod queue;

/// Outbound command writes.
pub mod sink;

// ============================================================================
// Display
// ============================================================================

/// Render loop and terminal lifecycle.
pub mod app;

/// Keyboard handling.
pub mod input;

/// Render-loop state.
pub mod state;

/// Colour palette.
pub mod theme;

/// Drawers for each screen.
pub mod ui;

// ============================================================================
// Ambient
// ============================================================================

/// Configuration file support.
pub mod config;

/// Error types.
pub mod error;

/// Log setup.
pub mod logging;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::app::{App, Pipeline};
    pub use crate::config::Config;
    pub use crate::error::{DisplayError, RecordError, Result};
    pub use crate::protocol::{parse_record, Command, GameState, LineDecoder, Snapshot};
    pub use crate::queue::transfer_queue;
    pub use crate::state::{DisplayState, Link};
}
