//! Serial wire protocol.
//!
//! Inbound, the controller prints newline-terminated lines: JSON state
//! records starting with `{` and free-text diagnostics. Outbound, the client
//! writes single ASCII command bytes.

pub mod command;
pub mod frame;
pub mod snapshot;

pub use command::Command;
pub use frame::{Decoded, LineDecoder, Record};
pub use snapshot::{
    parse_record, Board, Direction, GameState, HighScores, Hud, Point, Snapshot,
};
