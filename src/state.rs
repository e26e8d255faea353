//! State owned by the render loop.

use crate::protocol::{GameState, Snapshot};

/// The snapshot currently on screen, or nothing yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    current: Option<Snapshot>,
}

impl DisplayState {
    /// Starts with no data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one drained batch.
    ///
    /// The newest snapshot wins and the rest are never shown. An empty batch
    /// leaves the state unchanged. Returns true if the state was replaced.
    pub fn apply(&mut self, batch: Vec<Snapshot>) -> bool {
        match batch.into_iter().last() {
            Some(latest) => {
                self.current = Some(latest);
                true
            }
            None => false,
        }
    }

    /// The snapshot to draw, if any has arrived.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    /// Game state of the current snapshot.
    #[must_use]
    pub fn game_state(&self) -> Option<GameState> {
        self.current.as_ref().map(Snapshot::state)
    }
}

/// Whether the serial port is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// Reading from and writing to this port.
    Connected(String),
    /// The port failed to open; commands are dropped.
    Offline {
        /// Port that was tried.
        requested: String,
        /// Ports the OS reported at startup.
        available: Vec<String>,
    },
}

impl Link {
    /// True when a port is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }
}

/// Shared state for the display application.
#[derive(Debug)]
pub struct State {
    /// Latest game snapshot.
    pub display: DisplayState,
    /// Connection status shown on screen.
    pub link: Link,
    /// Frames drawn so far; drives animation.
    pub frame: u64,
    /// Snapshots received so far.
    pub received: u64,
    /// Whether the application should quit.
    pub should_quit: bool,
}

impl State {
    /// Creates the initial state: no data yet.
    #[must_use]
    pub fn new(link: Link) -> Self {
        Self { display: DisplayState::new(), link, frame: 0, received: 0, should_quit: false }
    }

    /// Applies a drained batch and counts it.
    pub fn ingest(&mut self, batch: Vec<Snapshot>) {
        self.received += batch.len() as u64;
        self.display.apply(batch);
    }

    /// Advances the animation counter.
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    /// Signals that the application should quit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::HighScores;

    fn scores(score: i64) -> Snapshot {
        Snapshot::HighScoreScreen(HighScores { score: Some(score), ..HighScores::default() })
    }

    #[test]
    fn test_display_state_starts_empty() {
        let state = DisplayState::new();
        assert!(state.current().is_none());
        assert!(state.game_state().is_none());
    }

    #[test]
    fn test_latest_in_batch_wins() {
        let mut state = DisplayState::new();
        assert!(state.apply(vec![scores(1), scores(2), scores(3)]));
        assert_eq!(state.current(), Some(&scores(3)));
    }

    #[test]
    fn test_empty_batch_keeps_state() {
        let mut state = DisplayState::new();
        state.apply(vec![Snapshot::Menu]);

        assert!(!state.apply(Vec::new()));
        assert_eq!(state.current(), Some(&Snapshot::Menu));
    }

    #[test]
    fn test_empty_batch_before_data_stays_waiting() {
        let mut state = DisplayState::new();
        state.apply(Vec::new());
        assert!(state.current().is_none());
    }

    #[test]
    fn test_state_counts_and_quits() {
        let mut state = State::new(Link::Connected("/dev/ttyACM0".to_string()));
        assert!(!state.should_quit);

        state.ingest(vec![Snapshot::Menu, scores(4)]);
        state.tick();
        state.quit();

        assert_eq!(state.received, 2);
        assert_eq!(state.frame, 1);
        assert_eq!(state.display.game_state(), Some(GameState::HighScoreScreen));
        assert!(state.should_quit);
    }

    #[test]
    fn test_link_status() {
        assert!(Link::Connected("COM3".to_string()).is_connected());
        let offline = Link::Offline { requested: "COM3".to_string(), available: Vec::new() };
        assert!(!offline.is_connected());
    }
}
