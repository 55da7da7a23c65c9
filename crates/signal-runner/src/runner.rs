//! Frame queue to detector to dispatcher loop

use crate::replay::{read_frames, ReplayFrame};
use crate::settings::Settings;
use face_signals::{SharedDetector, SignalDetector};
use signal_dispatch::{Dispatcher, SignalSink, WriterSink};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Frames buffered between the source task and the processing loop
pub const FRAME_QUEUE_CAPACITY: usize = 64;

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames taken off the queue
    pub frames: usize,
    /// Frames rejected by the detector (stale or unusable geometry)
    pub rejected: usize,
    /// Messages handed to the sink
    pub messages: usize,
    /// Messages the sink failed to deliver
    pub send_failures: usize,
}

/// Drain the queue through the detector and dispatcher.
///
/// Per-frame failures are logged and counted; the loop only ends when every
/// sender is dropped.
pub async fn process_frames<S: SignalSink>(
    mut rx: mpsc::Receiver<ReplayFrame>,
    detector: &SharedDetector,
    dispatcher: &mut Dispatcher<S>,
) -> RunStats {
    let mut stats = RunStats::default();

    while let Some(frame) = rx.recv().await {
        stats.frames += 1;
        let timestamp = frame.timestamp();

        let signals = match detector.process(timestamp, frame.landmarks.as_ref()) {
            Ok(signals) => signals,
            Err(e) => {
                stats.rejected += 1;
                if e.is_no_detection() {
                    debug!(at = ?timestamp, error = %e, "Frame skipped");
                } else {
                    warn!(at = ?timestamp, error = %e, "Frame rejected");
                }
                continue;
            }
        };

        match dispatcher.dispatch(timestamp, &signals) {
            Ok(Some(_)) => stats.messages += 1,
            Ok(None) => {}
            Err(_) => stats.send_failures += 1,
        }
    }

    stats
}

/// Replay `input` (stdin when `None` or `-`) and print tokens to stdout
pub async fn run(settings: Settings, input: Option<PathBuf>) -> anyhow::Result<RunStats> {
    let detector = SharedDetector::new(SignalDetector::new(settings.detector)?);
    let mut dispatcher = Dispatcher::new(settings.dispatch, WriterSink::new(std::io::stdout()));

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match input {
        Some(path) if path.as_os_str() != "-" => {
            info!("Replaying landmarks from {}", path.display());
            Box::new(BufReader::new(tokio::fs::File::open(&path).await?))
        }
        _ => {
            info!("Replaying landmarks from stdin");
            Box::new(BufReader::new(tokio::io::stdin()))
        }
    };

    let (tx, rx) = mpsc::channel(FRAME_QUEUE_CAPACITY);
    let source = tokio::spawn(read_frames(reader, tx));

    let stats = process_frames(rx, &detector, &mut dispatcher).await;
    let queued = source.await??;

    info!(
        queued,
        frames = stats.frames,
        rejected = stats.rejected,
        messages = stats.messages,
        "Replay finished"
    );
    Ok(stats)
}
