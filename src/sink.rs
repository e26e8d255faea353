//! Command sink: key presses out to the controller.

use crate::protocol::Command;
use crate::serial::CommandWriter;
use tracing::{debug, warn};

/// Writes commands to the controller, if there is one.
///
/// Commands are fire-and-forget. A failed write is logged and the next
/// command is attempted normally.
pub struct CommandSink {
    writer: Option<Box<dyn CommandWriter>>,
    sent: u64,
    failed: u64,
}

impl CommandSink {
    /// A sink backed by an open port.
    #[must_use]
    pub fn connected(writer: Box<dyn CommandWriter>) -> Self {
        Self { writer: Some(writer), sent: 0, failed: 0 }
    }

    /// A sink that drops every command.
    #[must_use]
    pub fn offline() -> Self {
        Self { writer: None, sent: 0, failed: 0 }
    }

    /// True when commands reach a port.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.writer.is_some()
    }

    /// Sends one command byte. Returns true if it was written.
    pub fn send(&mut self, command: Command) -> bool {
        let Some(writer) = self.writer.as_mut() else {
            debug!(%command, "no connection, command dropped");
            return false;
        };

        match writer.write_byte(command.as_byte()) {
            Ok(()) => {
                self.sent += 1;
                debug!(%command, "command sent");
                true
            }
            Err(e) => {
                self.failed += 1;
                warn!(%command, error = %e, "command write failed");
                false
            }
        }
    }

    /// Commands written and commands that failed.
    #[must_use]
    pub fn counts(&self) -> (u64, u64) {
        (self.sent, self.failed)
    }
}

impl std::fmt::Debug for CommandSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSink")
            .field("connected", &self.is_connected())
            .field("sent", &self.sent)
            .field("failed", &self.failed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<u8>>>);

    impl CommandWriter for Recorder {
        fn write_byte(&mut self, byte: u8) -> io::Result<()> {
            self.0.lock().unwrap().push(byte);
            Ok(())
        }
    }

    struct Unplugged;

    impl CommandWriter for Unplugged {
        fn write_byte(&mut self, _byte: u8) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "device removed"))
        }
    }

    #[test]
    fn test_send_writes_command_bytes() {
        let recorder = Recorder::default();
        let mut sink = CommandSink::connected(Box::new(recorder.clone()));

        assert!(sink.send(Command::ToggleSound));
        assert!(sink.send(Command::Reset));
        assert!(sink.send(Command::PauseResume));

        assert_eq!(*recorder.0.lock().unwrap(), b"srp".to_vec());
        assert_eq!(sink.counts(), (3, 0));
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let mut sink = CommandSink::connected(Box::new(Unplugged));

        assert!(!sink.send(Command::Reset));
        assert!(!sink.send(Command::Reset));
        assert_eq!(sink.counts(), (0, 2));
    }

    #[test]
    fn test_offline_sink_drops_commands() {
        let mut sink = CommandSink::offline();
        assert!(!sink.is_connected());
        assert!(!sink.send(Command::PauseResume));
        assert_eq!(sink.counts(), (0, 0));
    }
}
