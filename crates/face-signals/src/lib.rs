//! Face Signal Detection
//!
//! Converts a stream of face landmark frames into debounced control signals:
//! - Eye hold pulses (confirmed closure, failed hold, activation)
//! - Mouth open and smile
//! - Head direction relative to a recenterable baseline
//! - Per-eye winks
//!
//! [`SignalDetector`] owns all temporal state for one session;
//! [`SharedDetector`] puts it behind a single lock for concurrent producers.

pub mod config;
pub mod detector;
pub mod expression;
pub mod eye_hold;
pub mod head_zone;
pub mod shared;
pub mod signals;

pub use config::{MouthOpenMode, SignalConfig, MAX_HISTORY_LEN};
pub use detector::{Metric, RecordedSignals, SignalDetector};
pub use expression::{EyeExpression, ExpressionClassifier, MouthExpression};
pub use eye_hold::{EyeHoldMachine, EyeHoldPhase, EyeHoldState, EyePulse};
pub use head_zone::{HeadBaseline, HeadZone, HeadZoneDetector};
pub use shared::SharedDetector;
pub use signals::SignalSet;

use face_features::FeatureError;
use std::time::Duration;
use thiserror::Error;

/// Signal detection error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error("Stale frame at {frame:?}, already applied {last_applied:?}")]
    StaleFrame {
        frame: Duration,
        last_applied: Duration,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SignalError {
    /// Frame was skipped and should be treated as "no detection this tick"
    pub fn is_no_detection(&self) -> bool {
        matches!(self, Self::Feature(_))
    }
}
