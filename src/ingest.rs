//! Ingestion worker: serial bytes in, snapshots out.
//!
//! The worker owns the read half of the connection and the producer end of
//! the transfer queue. Each iteration it checks for unread bytes, reads what
//! is there, frames it into lines, parses structured lines and pushes the
//! resulting snapshots. Diagnostic lines go to a [`DiagnosticSink`].
//!
//! Nothing here is fatal. I/O errors are logged and retried after the poll
//! interval, forever. The loop ends only when the running flag is cleared or
//! the render loop drops its end of the queue.

use crate::error::RecordError;
use crate::protocol::{parse_record, LineDecoder, Record, Snapshot};
use crate::queue::QueueProducer;
use crate::serial::ByteSource;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

/// Receives free-text lines printed by the controller.
pub trait DiagnosticSink: Send {
    /// Handles one trimmed, non-blank diagnostic line.
    fn diagnostic(&mut self, line: &str);
}

/// Writes diagnostics to the log under the `device` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn diagnostic(&mut self, line: &str) {
        info!(target: "device", "{line}");
    }
}

/// Counters kept by the worker, returned when it is joined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    /// Bytes read from the source.
    pub bytes_read: u64,
    /// Complete lines framed.
    pub lines: u64,
    /// Snapshots pushed to the queue.
    pub snapshots: u64,
    /// Structured lines that were not valid JSON.
    pub malformed: u64,
    /// Structured lines rejected for a missing or invalid field.
    pub invalid: u64,
    /// Diagnostic lines forwarded to the sink.
    pub diagnostics: u64,
    /// Lines dropped because they were not UTF-8.
    pub encoding_errors: u64,
    /// Partial lines discarded for exceeding the length limit.
    pub overflows: u64,
    /// Failed availability checks or reads.
    pub io_errors: u64,
}

/// Outcome of one worker iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Bytes were read and processed.
    Data(usize),
    /// Nothing to read; sleep before the next check.
    Idle,
    /// An I/O error occurred; back off before retrying.
    Backoff,
    /// The consumer is gone; stop.
    Closed,
}

/// The producer side of the pipeline.
pub struct IngestWorker<S, D> {
    source: S,
    decoder: LineDecoder,
    producer: QueueProducer<Snapshot>,
    diagnostics: D,
    poll_interval: Duration,
    read_buf: Vec<u8>,
    error_streak: u64,
    stats: IngestStats,
}

impl<S: ByteSource, D: DiagnosticSink> IngestWorker<S, D> {
    /// Creates a worker over `source` feeding `producer`.
    pub fn new(
        source: S,
        producer: QueueProducer<Snapshot>,
        diagnostics: D,
        poll_interval: Duration,
        max_line_bytes: usize,
    ) -> Self {
        Self {
            source,
            decoder: LineDecoder::new(max_line_bytes),
            producer,
            diagnostics,
            poll_interval,
            read_buf: Vec::new(),
            error_streak: 0,
            stats: IngestStats::default(),
        }
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Frames, parses and forwards a chunk of bytes.
    ///
    /// Returns false if the consumer has gone away.
    pub fn process(&mut self, bytes: &[u8]) -> bool {
        self.stats.bytes_read += bytes.len() as u64;

        let was_resyncing = self.decoder.is_resyncing();
        let decoded = self.decoder.feed(bytes);
        self.stats.encoding_errors += decoded.invalid_utf8 as u64;
        self.stats.overflows += decoded.overflows as u64;
        if decoded.overflows > 0 {
            warn!(
                count = decoded.overflows,
                resyncing = self.decoder.is_resyncing(),
                "discarded oversized partial line"
            );
        }
        if was_resyncing && !self.decoder.is_resyncing() {
            debug!("resynchronised at newline");
        }
        if decoded.invalid_utf8 > 0 {
            debug!(count = decoded.invalid_utf8, "dropped non-UTF-8 line");
        }

        for record in decoded.records {
            self.stats.lines += 1;
            match record {
                Record::Structured(text) => match parse_record(&text) {
                    Ok(snapshot) => {
                        trace!(state = %snapshot.state(), "snapshot decoded");
                        if !self.producer.push(snapshot) {
                            return false;
                        }
                        self.stats.snapshots += 1;
                    }
                    Err(RecordError::Malformed(reason)) => {
                        self.stats.malformed += 1;
                        debug!(%reason, "discarded malformed record");
                    }
                    Err(reason) => {
                        self.stats.invalid += 1;
                        debug!(%reason, "discarded invalid record");
                    }
                },
                Record::Diagnostic(text) => {
                    if !text.is_empty() {
                        self.stats.diagnostics += 1;
                        self.diagnostics.diagnostic(&text);
                    }
                }
            }
        }
        true
    }

    /// Runs one availability check and, if bytes are waiting, one read.
    pub fn step(&mut self) -> Step {
        let available = match self.source.bytes_available() {
            Ok(0) => return self.recovered(Step::Idle),
            Ok(n) => n,
            Err(e) => return self.io_failure(&e),
        };

        self.read_buf.resize(available, 0);
        match self.source.read_available(&mut self.read_buf) {
            Ok(0) => self.recovered(Step::Idle),
            Ok(n) => {
                let chunk = std::mem::take(&mut self.read_buf);
                let open = self.process(&chunk[..n]);
                self.read_buf = chunk;
                if open {
                    self.recovered(Step::Data(n))
                } else {
                    Step::Closed
                }
            }
            Err(e) if is_no_data(&e) => self.recovered(Step::Idle),
            Err(e) => self.io_failure(&e),
        }
    }

    /// Loops until `running` is cleared or the consumer is dropped.
    pub fn run(mut self, running: &AtomicBool) -> IngestStats {
        info!("ingestion worker started");
        while running.load(Ordering::Acquire) {
            match self.step() {
                Step::Data(_) => {}
                Step::Idle | Step::Backoff => thread::sleep(self.poll_interval),
                Step::Closed => {
                    info!("render loop gone, stopping ingestion");
                    break;
                }
            }
        }
        info!(stats = ?self.stats, "ingestion worker stopped");
        self.stats
    }

    fn recovered(&mut self, step: Step) -> Step {
        if self.error_streak > 0 {
            info!(failures = self.error_streak, "serial reads recovered");
            self.error_streak = 0;
        }
        step
    }

    fn io_failure(&mut self, e: &io::Error) -> Step {
        self.stats.io_errors += 1;
        self.error_streak += 1;
        if self.error_streak == 1 {
            warn!(error = %e, "serial read error, retrying");
        } else {
            debug!(error = %e, streak = self.error_streak, "serial read error");
        }
        Step::Backoff
    }
}

impl<S, D> IngestWorker<S, D>
where
    S: ByteSource + 'static,
    D: DiagnosticSink + 'static,
{
    /// Starts the worker on its own thread.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(self) -> io::Result<WorkerHandle> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let thread = thread::Builder::new()
            .name("serial-ingest".to_string())
            .spawn(move || self.run(&flag))?;
        Ok(WorkerHandle { running, thread })
    }
}

impl<S, D> std::fmt::Debug for IngestWorker<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestWorker")
            .field("pending", &self.decoder.pending())
            .field("resyncing", &self.decoder.is_resyncing())
            .field("poll_interval", &self.poll_interval)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Handle to a running worker thread.
#[derive(Debug)]
pub struct WorkerHandle {
    running: Arc<AtomicBool>,
    thread: JoinHandle<IngestStats>,
}

impl WorkerHandle {
    /// Clears the running flag and waits for the thread to exit.
    ///
    /// The worker checks the flag after every sleep, so this returns within
    /// roughly one poll interval plus one port read timeout.
    pub fn stop(self) -> IngestStats {
        self.running.store(false, Ordering::Release);
        self.thread.join().unwrap_or_else(|_| {
            error!("ingestion worker panicked");
            IngestStats::default()
        })
    }
}

fn is_no_data(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}
