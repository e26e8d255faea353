//! Main application loop for the display client.

use crate::config::Config;
use crate::error::{DisplayError, Result};
use crate::ingest::{IngestStats, IngestWorker, LogSink, WorkerHandle};
use crate::input::{Action, InputHandler};
use crate::protocol::Snapshot;
use crate::queue::{transfer_queue, QueueConsumer};
use crate::serial::{available_ports, Connection};
use crate::sink::CommandSink;
use crate::state::{Link, State};
use crate::ui::{self, RenderSettings};

use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use std::io::{self, stdout};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Everything on the far side of the render loop: the queue it drains, the
/// sink it writes to and the worker it must stop.
#[derive(Debug)]
pub struct Pipeline {
    /// Connection status for the UI.
    pub link: Link,
    queue: QueueConsumer<Snapshot>,
    sink: CommandSink,
    worker: Option<WorkerHandle>,
}

impl Pipeline {
    /// Opens the configured port and starts the ingestion worker.
    ///
    /// If the port cannot be opened the pipeline runs offline: the queue
    /// stays empty and commands are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::WorkerSpawn`] if the worker thread cannot be
    /// started.
    pub fn connect(config: &Config) -> Result<Self> {
        match Connection::open(config) {
            Ok(connection) => {
                let port = connection.port_name.clone();
                let (reader, writer) = connection.split();
                let (producer, queue) = transfer_queue();
                let worker = IngestWorker::new(
                    reader,
                    producer,
                    LogSink,
                    config.poll_interval(),
                    config.serial.max_line_bytes,
                );
                let handle = worker.spawn().map_err(DisplayError::WorkerSpawn)?;
                Ok(Self {
                    link: Link::Connected(port),
                    queue,
                    sink: CommandSink::connected(Box::new(writer)),
                    worker: Some(handle),
                })
            }
            Err(e) => {
                let available = available_ports();
                warn!(error = %e, ?available, "running without a serial connection");
                Ok(Self::offline(config.serial.port.clone(), available))
            }
        }
    }

    /// A pipeline with no port behind it.
    #[must_use]
    pub fn offline(requested: String, available: Vec<String>) -> Self {
        let (_, queue) = transfer_queue();
        Self {
            link: Link::Offline { requested, available },
            queue,
            sink: CommandSink::offline(),
            worker: None,
        }
    }

    /// A pipeline over caller-supplied parts.
    #[must_use]
    pub fn from_parts(
        link: Link,
        queue: QueueConsumer<Snapshot>,
        sink: CommandSink,
        worker: Option<WorkerHandle>,
    ) -> Self {
        Self { link, queue, sink, worker }
    }
}

/// Source of terminal input events.
trait EventSource {
    /// Waits up to `timeout` for an event; true if one is ready.
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Reads the ready event.
    fn read(&mut self) -> io::Result<Event>;
}

/// Crossterm's global event queue.
struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}

/// The display application.
pub struct App {
    /// Configuration.
    config: Config,
    /// Resolved drawing settings.
    settings: RenderSettings,
    /// Application state.
    state: State,
    /// Input handler.
    input: InputHandler,
    /// Snapshots from the worker.
    queue: QueueConsumer<Snapshot>,
    /// Write half; `None` once shut down.
    sink: Option<CommandSink>,
    /// Worker thread; `None` once joined.
    worker: Option<WorkerHandle>,
}

impl App {
    /// Creates a new application over a pipeline.
    #[must_use]
    pub fn new(config: Config, pipeline: Pipeline) -> Self {
        let settings = RenderSettings::from_config(&config);
        Self {
            config,
            settings,
            state: State::new(pipeline.link),
            input: InputHandler::new(),
            queue: pipeline.queue,
            sink: Some(pipeline.sink),
            worker: pipeline.worker,
        }
    }

    /// Runs the application main loop, then shuts the pipeline down.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup or rendering fails.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        stdout().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.shutdown();
        result
    }

    /// Fixed-rate loop: drain, draw, then handle input until the frame ends.
    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let frame_interval = self.config.frame_interval();
        let mut events = TerminalEvents;
        info!(?frame_interval, "render loop started");

        loop {
            let deadline = Instant::now() + frame_interval;

            self.update();
            terminal.draw(|frame| self.render(frame))?;

            self.pump_events(&mut events, deadline)?;
            if self.state.should_quit {
                break;
            }
        }

        info!(frames = self.state.frame, snapshots = self.state.received, "render loop stopped");
        Ok(())
    }

    /// Handles input until `deadline`.
    ///
    /// Returns at the deadline no matter how much input arrives, so a held
    /// key cannot speed up the frame rate. Returns early only on quit.
    fn pump_events(&mut self, events: &mut impl EventSource, deadline: Instant) -> Result<()> {
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !events.poll(remaining)? {
                if remaining.is_zero() {
                    return Ok(());
                }
                continue;
            }
            if let Event::Key(key) = events.read()? {
                let action = self.input.handle_key(key);
                self.handle_action(action);
            }
            if self.state.should_quit || Instant::now() >= deadline {
                return Ok(());
            }
        }
    }

    /// Handles an input action.
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.state.quit(),
            Action::Send(command) => {
                if let Some(sink) = self.sink.as_mut() {
                    sink.send(command);
                }
            }
            Action::None => {}
        }
    }

    /// Drains the queue into the display state and advances the frame counter.
    pub fn update(&mut self) {
        self.state.ingest(self.queue.drain_all());
        self.state.tick();
    }

    /// Renders the application.
    pub fn render(&self, frame: &mut Frame) {
        ui::draw(frame, &self.state, &self.settings);
    }

    /// Stops and joins the worker, then releases the port's write half.
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn shutdown(&mut self) -> Option<IngestStats> {
        let stats = self.worker.take().map(WorkerHandle::stop);
        if let Some(stats) = &stats {
            info!(?stats, "ingestion stats");
        }
        if let Some(sink) = self.sink.take() {
            let (sent, failed) = sink.counts();
            info!(sent, failed, "command sink closed");
        }
        stats
    }

    /// Returns whether the app should quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.state.should_quit
    }

    /// Current state, for inspection.
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("sink", &self.sink)
            .field("worker", &self.worker)
            .finish_non_exhaustive()
    }
}
