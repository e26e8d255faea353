//! Serial connection to the game controller.
//!
//! [`Connection::open`] opens the port and clones the handle so the
//! ingestion worker can read while the render loop writes commands. The two
//! halves sit behind [`ByteSource`] and [`CommandWriter`] so the pipeline can
//! run against in-memory transports in tests.

use crate::config::Config;
use crate::error::{DisplayError, Result};
use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::thread;
use tracing::{debug, info, warn};

/// Non-blocking view of the inbound byte stream.
pub trait ByteSource: Send {
    /// Number of bytes that can be read without waiting.
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Reads up to `buf.len()` bytes.
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Outbound command channel.
pub trait CommandWriter: Send {
    /// Writes one byte and flushes it to the wire.
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;
}

/// Read half of an open port.
pub struct SerialReader {
    port: Box<dyn SerialPort>,
}

impl ByteSource for SerialReader {
    fn bytes_available(&mut self) -> io::Result<usize> {
        self.port.bytes_to_read().map(|n| n as usize).map_err(io::Error::from)
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

impl std::fmt::Debug for SerialReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialReader").field("port", &self.port.name()).finish()
    }
}

/// Write half of an open port.
pub struct SerialWriter {
    port: Box<dyn SerialPort>,
}

impl CommandWriter for SerialWriter {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.port.write_all(&[byte])?;
        self.port.flush()
    }
}

impl std::fmt::Debug for SerialWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialWriter").field("port", &self.port.name()).finish()
    }
}

/// An open serial port, not yet split between threads.
#[derive(Debug)]
pub struct Connection {
    /// Port identifier as requested.
    pub port_name: String,
    reader: SerialReader,
    writer: SerialWriter,
}

impl Connection {
    /// Opens the configured port, then waits the settle delay.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::SerialOpen`] if the port cannot be opened or
    /// its handle cannot be cloned.
    pub fn open(config: &Config) -> Result<Self> {
        let port_name = config.serial.port.clone();
        let open_error = |e: serialport::Error| DisplayError::SerialOpen {
            port: port_name.clone(),
            message: e.to_string(),
        };

        let port = serialport::new(&port_name, config.serial.baud_rate)
            .timeout(config.read_timeout())
            .open()
            .map_err(open_error)?;
        let writer = port.try_clone().map_err(open_error)?;

        info!(port = %port_name, baud = config.serial.baud_rate, "serial port opened");

        let settle = config.settle_delay();
        if !settle.is_zero() {
            debug!(?settle, "waiting for controller reset");
            thread::sleep(settle);
        }

        Ok(Self {
            port_name,
            reader: SerialReader { port },
            writer: SerialWriter { port: writer },
        })
    }

    /// Splits into the worker's read half and the command sink's write half.
    #[must_use]
    pub fn split(self) -> (SerialReader, SerialWriter) {
        (self.reader, self.writer)
    }
}

/// Names of the serial ports the OS reports.
#[must_use]
pub fn available_ports() -> Vec<String> {
    match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
        Err(e) => {
            warn!(error = %e, "could not enumerate serial ports");
            Vec::new()
        }
    }
}
