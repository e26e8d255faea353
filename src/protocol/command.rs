//! Outbound single-byte commands.

use std::fmt;

/// A command the controller accepts over the serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Toggle the buzzer.
    ToggleSound,
    /// Restart the game.
    Reset,
    /// Pause or resume.
    PauseResume,
}

impl Command {
    /// Every command, in key-hint order.
    pub const ALL: [Self; 3] = [Self::ToggleSound, Self::Reset, Self::PauseResume];

    /// Byte written to the wire.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::ToggleSound => b's',
            Self::Reset => b'r',
            Self::PauseResume => b'p',
        }
    }

    /// Looks up the command bound to a key character, case-insensitively.
    #[must_use]
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            's' => Some(Self::ToggleSound),
            'r' => Some(Self::Reset),
            'p' => Some(Self::PauseResume),
            _ => None,
        }
    }

    /// Short label for the key-hint footer.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ToggleSound => "sound",
            Self::Reset => "reset",
            Self::PauseResume => "pause",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ('{}')", self.label(), char::from(self.as_byte()))
    }
}
