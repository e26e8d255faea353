//! snake-display: terminal display for the serial snake game.
//!
//! Run: `snake-display [PORT]`

use snake_display::prelude::*;
use snake_display::logging;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

/// Terminal display for a serial snake game controller
#[derive(Parser, Debug)]
#[command(name = "snake-display")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Terminal display for a serial snake game controller", long_about = None)]
struct Cli {
    /// Serial port (defaults to the configured or platform port)
    port: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let (config, config_warning) = match Config::default_path() {
        Some(path) => Config::load_or_default(path),
        None => (Config::default(), None),
    };
    let config = config.with_port(cli.port);

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Warning: {e}");
    }
    if let Some(e) = config_warning {
        warn!(error = %e, "using default configuration");
    }

    eprintln!("Connecting to {}...", config.serial.port);
    info!(port = %config.serial.port, baud = config.serial.baud_rate, "starting");

    let pipeline = Pipeline::connect(&config).context("starting serial pipeline")?;
    let mut app = App::new(config, pipeline);
    app.run().context("display loop failed")?;

    info!("exited cleanly");
    Ok(())
}
