//! Keyboard handling for the display window.

use crate::protocol::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the render loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Close the window and shut down.
    Quit,
    /// Forward a command to the controller.
    Send(Command),
    /// Nothing bound to this key.
    None,
}

/// Maps key events to actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Creates a new input handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Handles a key event and returns the corresponding action.
    ///
    /// Only presses count; release and repeat events map to [`Action::None`]
    /// so a held key sends one command.
    #[must_use]
    pub fn handle_key(&self, event: KeyEvent) -> Action {
        if event.kind != KeyEventKind::Press {
            return Action::None;
        }

        // Check for Ctrl+C or Ctrl+Q
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            return match event.code {
                KeyCode::Char('c' | 'q') => Action::Quit,
                _ => Action::None,
            };
        }

        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char(c) => Command::from_key(c).map_or(Action::None, Action::Send),
            _ => Action::None,
        }
    }
}
