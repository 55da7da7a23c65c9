//! JSON-lines landmark replay
//!
//! One object per line:
//! `{"timestamp_ms": 1200, "landmarks": [{"x": 0.5, "y": 0.4, "z": 0.0}, ...]}`.
//! `"landmarks": null` (or a missing field) marks a frame with no face.

use face_features::LandmarkFrame;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// One recorded landmark model result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// Milliseconds since session origin
    pub timestamp_ms: u64,
    #[serde(default)]
    pub landmarks: Option<LandmarkFrame>,
}

impl ReplayFrame {
    pub fn new(timestamp: Duration, landmarks: Option<LandmarkFrame>) -> Self {
        Self {
            timestamp_ms: timestamp.as_millis() as u64,
            landmarks,
        }
    }

    pub fn timestamp(&self) -> Duration {
        Duration::from_millis(self.timestamp_ms)
    }
}

/// Parse one line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ReplayFrame>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Read frames from `reader` into the queue until EOF or the receiver closes.
///
/// Unparsable lines are logged and skipped. Returns the number of frames queued.
pub async fn read_frames<R>(reader: R, tx: mpsc::Sender<ReplayFrame>) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    let mut queued = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let frame = match parse_line(&line) {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping unparsable replay line");
                continue;
            }
        };

        if tx.send(frame).await.is_err() {
            debug!("Frame queue closed, stopping replay");
            break;
        }
        queued += 1;
    }

    Ok(queued)
}
