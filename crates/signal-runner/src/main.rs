//! Face Signals - Main Entry Point

use anyhow::Result;
use clap::Parser;
use signal_runner::{init_logging, run, Preset, Settings};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "FACE_SIGNALS_CONFIG")]
    config: Option<PathBuf>,

    /// JSON-lines landmark recording ("-" for stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Detector preset used beneath the file and environment layers
    #[arg(short, long, value_enum, default_value = "default")]
    preset: Preset,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref(), args.preset)?;
    if let Some(level) = args.log_level {
        settings.logging.level = level;
    }
    if args.json_logs {
        settings.logging.json = true;
    }
    init_logging(&settings.logging)?;

    info!("=== Face Signals v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Detector config: {:?}", settings.detector);

    let stats = run(settings, args.input).await?;
    info!(
        "Processed {} frames, sent {} messages",
        stats.frames, stats.messages
    );

    Ok(())
}
