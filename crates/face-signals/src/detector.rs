//! Frame-processing entry point owning all temporal state

use crate::expression::{EyeExpression, ExpressionClassifier};
use crate::eye_hold::{EyeHoldMachine, EyeHoldPhase, EyeHoldState, EyePulse};
use crate::head_zone::{HeadBaseline, HeadZoneDetector};
use crate::signals::SignalSet;
use crate::{SignalConfig, SignalError};
use face_features::{extract_metrics, LandmarkFrame};
use metric_window::Smoother;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, warn};

/// Smoothed metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    LeftEyeRatio,
    RightEyeRatio,
}

/// A non-empty signal set and when it was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedSignals {
    pub timestamp: Duration,
    pub signals: SignalSet,
}

/// Signal detector for one face session.
///
/// Owns the smoothing windows, the eye hold state, and the head baseline.
/// Frames must be fed in timestamp order; older frames are rejected.
pub struct SignalDetector {
    config: SignalConfig,
    smoother: Smoother<Metric>,
    eye_hold: EyeHoldMachine,
    head_zone: HeadZoneDetector,
    expression: ExpressionClassifier,
    last_applied: Option<Duration>,
    history: VecDeque<RecordedSignals>,
}

impl SignalDetector {
    /// Create a new detector with configuration
    pub fn new(config: SignalConfig) -> Result<Self, SignalError> {
        config.validate()?;
        let smoother =
            Smoother::new(config.window_size).map_err(|e| SignalError::Config(e.to_string()))?;

        Ok(Self {
            smoother,
            eye_hold: EyeHoldMachine::new(&config),
            head_zone: HeadZoneDetector::new(config.head_box_scale),
            expression: ExpressionClassifier::new(&config),
            last_applied: None,
            history: VecDeque::with_capacity(config.history_len),
            config,
        })
    }

    /// Process one frame result.
    ///
    /// `face` is `None` when the landmark model found no face. Such frames,
    /// and frames that fail extraction, leave every window and timer
    /// untouched; an open eye episode is suspended until measurements resume.
    pub fn process(
        &mut self,
        timestamp: Duration,
        face: Option<&LandmarkFrame>,
    ) -> Result<SignalSet, SignalError> {
        if let Some(last_applied) = self.last_applied {
            if timestamp < last_applied {
                metrics::counter!("face_signals_frames_dropped_total", "reason" => "stale")
                    .increment(1);
                warn!(frame = ?timestamp, last_applied = ?last_applied, "Dropping stale frame");
                return Err(SignalError::StaleFrame {
                    frame: timestamp,
                    last_applied,
                });
            }
        }
        self.last_applied = Some(timestamp);

        let Some(frame) = face else {
            metrics::counter!("face_signals_frames_dropped_total", "reason" => "no_face")
                .increment(1);
            debug!(at = ?timestamp, "No face in frame");
            self.eye_hold.suspend(timestamp);
            return Ok(SignalSet::no_face());
        };

        let measured = match extract_metrics(frame) {
            Ok(measured) => measured,
            Err(e) => {
                metrics::counter!("face_signals_frames_dropped_total", "reason" => "malformed")
                    .increment(1);
                warn!(at = ?timestamp, error = %e, "Skipping malformed frame");
                self.eye_hold.suspend(timestamp);
                return Err(e.into());
            }
        };

        let left = self
            .smoother
            .update(Metric::LeftEyeRatio, measured.left_eye_ratio);
        let right = self
            .smoother
            .update(Metric::RightEyeRatio, measured.right_eye_ratio);
        let joint = (left + right) / 2.0;

        let pulse = self.eye_hold.update(joint, timestamp);
        let zone = self.head_zone.update(measured.centroid, measured.face_span);
        let mouth = self.expression.classify(&measured);
        let eyes = EyeExpression::classify(left, right, self.config.closed_threshold);

        let signals = SignalSet::detected(pulse, mouth, zone, eyes);

        metrics::counter!("face_signals_frames_processed_total").increment(1);
        if let Some(pulse) = pulse {
            let kind = match pulse {
                EyePulse::Closed => "closed",
                EyePulse::Failed => "failed",
                EyePulse::Activate => "activate",
            };
            metrics::counter!("face_signals_eye_pulses_total", "kind" => kind).increment(1);
        }

        if signals.has_signals() {
            self.record(timestamp, signals);
        }

        Ok(signals)
    }

    /// Re-anchor the head baseline on the next detected frame
    pub fn reset_baseline(&mut self) {
        self.head_zone.reset();
    }

    /// Replace the head baseline now
    pub fn recenter(&mut self, baseline: HeadBaseline) {
        self.head_zone.recenter(baseline);
    }

    /// Reset all temporal state (on user change)
    pub fn reset_session(&mut self) {
        self.smoother.reset();
        self.eye_hold.reset();
        self.head_zone.reset();
        self.history.clear();
        self.last_applied = None;
    }

    pub fn eye_state(&self) -> &EyeHoldState {
        self.eye_hold.state()
    }

    pub fn eye_phase(&self) -> EyeHoldPhase {
        self.eye_hold.phase()
    }

    pub fn baseline(&self) -> Option<HeadBaseline> {
        self.head_zone.baseline()
    }

    /// Current smoothed value of a metric
    pub fn smoothed(&self, metric: Metric) -> Option<f64> {
        self.smoother.mean(metric)
    }

    /// Timestamp of the last accepted frame
    pub fn last_applied(&self) -> Option<Duration> {
        self.last_applied
    }

    /// Most recent non-empty signal sets, oldest first
    pub fn recent(&self) -> impl Iterator<Item = &RecordedSignals> {
        self.history.iter()
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    fn record(&mut self, timestamp: Duration, signals: SignalSet) {
        if self.config.history_len == 0 {
            return;
        }
        if self.history.len() >= self.config.history_len {
            self.history.pop_front();
        }
        self.history.push_back(RecordedSignals { timestamp, signals });
    }
}
