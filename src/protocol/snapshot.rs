//! Game-state snapshots and the structured record parser.
//!
//! The controller sends JSON objects keyed by an integer `state`. Which other
//! fields are required depends on the state:
//!
//! | state | variant           | required                                            |
//! |-------|-------------------|-----------------------------------------------------|
//! | 0     | `Menu`            | -                                                   |
//! | 1     | `Playing`         | snake, food, score, highScore, level, lives, direction |
//! | 2     | `Paused`          | as Playing                                          |
//! | 3     | `GameOver`        | as Playing                                          |
//! | 4     | `HighScoreScreen` | - (score, highScore, level used when present)       |
//!
//! A record that lacks a required field is rejected as a whole; no partially
//! filled snapshot is ever produced.

use crate::error::RecordError;
use serde::Deserialize;
use std::fmt;

/// Wire value of the `state` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Title screen.
    Menu,
    /// Game in progress.
    Playing,
    /// Game paused.
    Paused,
    /// Game finished.
    GameOver,
    /// High score table.
    HighScoreScreen,
}

impl GameState {
    /// Variant name, used in logs and errors.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Menu => "Menu",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::GameOver => "GameOver",
            Self::HighScoreScreen => "HighScoreScreen",
        }
    }
}

impl TryFrom<i64> for GameState {
    type Error = RecordError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Menu),
            1 => Ok(Self::Playing),
            2 => Ok(Self::Paused),
            3 => Ok(Self::GameOver),
            4 => Ok(Self::HighScoreScreen),
            other => Err(RecordError::UnknownState(other)),
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A board coordinate in game cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct Point {
    /// Column, 0 at the left edge.
    pub x: i32,
    /// Row, 0 at the top edge.
    pub y: i32,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Heading of the snake, wire values 0 to 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Wire value 0.
    Right,
    /// Wire value 1.
    Up,
    /// Wire value 2.
    Left,
    /// Wire value 3.
    Down,
}

impl Direction {
    /// Arrow shown in the HUD.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Right => "→",
            Self::Up => "↑",
            Self::Left => "←",
            Self::Down => "↓",
        }
    }
}

impl TryFrom<i64> for Direction {
    type Error = RecordError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Right),
            1 => Ok(Self::Up),
            2 => Ok(Self::Left),
            3 => Ok(Self::Down),
            other => Err(RecordError::InvalidField {
                field: "direction",
                message: format!("expected 0-3, got {other}"),
            }),
        }
    }
}

/// Score line values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    /// Current score.
    pub score: i64,
    /// Best score the controller has stored.
    pub high_score: i64,
    /// Current level.
    pub level: i64,
    /// Remaining lives.
    pub lives: i64,
    /// Current heading.
    pub direction: Direction,
}

impl Hud {
    /// True when this game matched or set the stored best.
    #[must_use]
    pub fn is_new_high_score(&self) -> bool {
        self.score == self.high_score
    }
}

/// Everything needed to draw the playfield.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Segments, head first.
    pub snake: Vec<Point>,
    /// Food position.
    pub food: Point,
    /// Score line.
    pub hud: Hud,
}

impl Board {
    /// Head segment, if the snake has any segments.
    #[must_use]
    pub fn head(&self) -> Option<Point> {
        self.snake.first().copied()
    }
}

/// Optional values shown on the high score screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScores {
    /// Score of the last game.
    pub score: Option<i64>,
    /// Stored best.
    pub high_score: Option<i64>,
    /// Level reached.
    pub level: Option<i64>,
}

impl HighScores {
    /// True when none of the values were sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.score.is_none() && self.high_score.is_none() && self.level.is_none()
    }
}

/// One decoded game-state record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// Title screen.
    Menu,
    /// Game in progress.
    Playing(Board),
    /// Game paused.
    Paused(Board),
    /// Game finished.
    GameOver(Board),
    /// High score table.
    HighScoreScreen(HighScores),
}

impl Snapshot {
    /// The state tag of this snapshot.
    #[must_use]
    pub fn state(&self) -> GameState {
        match self {
            Self::Menu => GameState::Menu,
            Self::Playing(_) => GameState::Playing,
            Self::Paused(_) => GameState::Paused,
            Self::GameOver(_) => GameState::GameOver,
            Self::HighScoreScreen(_) => GameState::HighScoreScreen,
        }
    }

    /// Board payload for the playfield variants.
    #[must_use]
    pub fn board(&self) -> Option<&Board> {
        match self {
            Self::Playing(board) | Self::Paused(board) | Self::GameOver(board) => Some(board),
            Self::Menu | Self::HighScoreScreen(_) => None,
        }
    }
}

/// Wire shape before validation; every field may be absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    state: Option<i64>,
    snake: Option<Vec<Point>>,
    food: Option<Point>,
    score: Option<i64>,
    high_score: Option<i64>,
    level: Option<i64>,
    lives: Option<i64>,
    direction: Option<i64>,
}

fn require<T>(value: Option<T>, state: GameState, field: &'static str) -> Result<T, RecordError> {
    value.ok_or(RecordError::MissingField { state: state.name(), field })
}

impl RawRecord {
    fn into_board(self, state: GameState) -> Result<Board, RecordError> {
        let snake = require(self.snake, state, "snake")?;
        let food = require(self.food, state, "food")?;
        let hud = Hud {
            score: require(self.score, state, "score")?,
            high_score: require(self.high_score, state, "highScore")?,
            level: require(self.level, state, "level")?,
            lives: require(self.lives, state, "lives")?,
            direction: Direction::try_from(require(self.direction, state, "direction")?)?,
        };
        Ok(Board { snake, food, hud })
    }
}

impl RawRecord {
    fn into_snapshot(self) -> Result<Snapshot, RecordError> {
        let Some(tag) = self.state else {
            return Err(RecordError::MissingField { state: "unknown", field: "state" });
        };

        match GameState::try_from(tag)? {
            GameState::Menu => Ok(Snapshot::Menu),
            GameState::Playing => self.into_board(GameState::Playing).map(Snapshot::Playing),
            GameState::Paused => self.into_board(GameState::Paused).map(Snapshot::Paused),
            GameState::GameOver => self.into_board(GameState::GameOver).map(Snapshot::GameOver),
            GameState::HighScoreScreen => Ok(Snapshot::HighScoreScreen(HighScores {
                score: self.score,
                high_score: self.high_score,
                level: self.level,
            })),
        }
    }
}

/// Parses one structured record.
///
/// # Errors
///
/// [`RecordError::Malformed`] for invalid JSON or mistyped fields, and the
/// other variants for a missing or out-of-range value. Callers discard the
/// record in every case.
pub fn parse_record(text: &str) -> Result<Snapshot, RecordError> {
    let raw: RawRecord =
        serde_json::from_str(text).map_err(|e| RecordError::Malformed(e.to_string()))?;
    raw.into_snapshot()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Arbitrary text never panics the parser.
        #[test]
        fn prop_arbitrary_text_never_panics(text in "\\PC{0,200}") {
            let _ = parse_record(&text);
        }

        /// Text that is not a JSON object never yields a snapshot.
        #[test]
        fn prop_non_object_rejected(text in "[^{\\[\\s]\\PC{0,80}") {
            prop_assert!(parse_record(&text).is_err());
        }
    }
}
