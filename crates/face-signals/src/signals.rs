//! Per-frame signal output

use crate::expression::{EyeExpression, MouthExpression};
use crate::eye_hold::EyePulse;
use crate::head_zone::HeadZone;
use serde::{Deserialize, Serialize};

/// Signals produced for one processed frame.
///
/// Pulse fields are true only on the frame where the transition happened.
/// Level fields (mouth, smile, head) reflect the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    /// Whether the frame carried a usable face
    pub face_detected: bool,

    pub eye_closed_pulse: bool,
    pub eye_failed_pulse: bool,
    pub eye_activate_pulse: bool,

    pub mouth_open: bool,
    pub smile: bool,

    pub head_left: bool,
    pub head_right: bool,
    pub head_up: bool,
    pub head_down: bool,

    /// Per-eye closed state from the smoothed per-eye ratios
    pub eye_expression: EyeExpression,
}

impl SignalSet {
    /// Output for a frame without a face
    pub fn no_face() -> Self {
        Self::default()
    }

    /// Assemble a detected-face signal set
    pub fn detected(
        pulse: Option<EyePulse>,
        mouth: MouthExpression,
        zone: HeadZone,
        eye_expression: EyeExpression,
    ) -> Self {
        Self {
            face_detected: true,
            eye_closed_pulse: pulse == Some(EyePulse::Closed),
            eye_failed_pulse: pulse == Some(EyePulse::Failed),
            eye_activate_pulse: pulse == Some(EyePulse::Activate),
            mouth_open: mouth.mouth_open,
            smile: mouth.smile,
            head_left: zone.left,
            head_right: zone.right,
            head_up: zone.up,
            head_down: zone.down,
            eye_expression,
        }
    }

    /// The eye pulse fired this frame, if any
    pub fn eye_pulse(&self) -> Option<EyePulse> {
        if self.eye_closed_pulse {
            Some(EyePulse::Closed)
        } else if self.eye_failed_pulse {
            Some(EyePulse::Failed)
        } else if self.eye_activate_pulse {
            Some(EyePulse::Activate)
        } else {
            None
        }
    }

    pub fn head_zone(&self) -> HeadZone {
        HeadZone {
            left: self.head_left,
            right: self.head_right,
            up: self.head_up,
            down: self.head_down,
        }
    }

    /// Check if any signal is set (a wink counts, both-eyes-closed does not)
    pub fn has_signals(&self) -> bool {
        self.eye_pulse().is_some()
            || self.mouth_open
            || self.smile
            || !self.head_zone().is_centered()
            || self.eye_expression.is_wink()
    }
}
