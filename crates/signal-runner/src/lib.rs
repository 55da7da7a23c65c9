//! Face Signal Runner
//!
//! Loads layered settings, initialises logging, and replays recorded
//! landmark frames through the detector and dispatcher.

pub mod replay;
pub mod runner;
pub mod settings;

pub use replay::{parse_line, read_frames, ReplayFrame};
pub use runner::{process_frames, run, RunStats, FRAME_QUEUE_CAPACITY};
pub use settings::{LoggingSettings, Preset, Settings};

use anyhow::Context;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    let level: Level = settings
        .level
        .parse()
        .with_context(|| format!("Invalid log level {:?}", settings.level))?;

    // Logs go to stderr; stdout carries the token stream
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = if settings.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.context("Failed to set tracing subscriber")
}
