//! Head zone detection against a recenterable baseline

use face_features::Centroid;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Reference head position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadBaseline {
    pub center_x: f64,
    pub center_y: f64,
}

impl From<Centroid> for HeadBaseline {
    fn from(c: Centroid) -> Self {
        Self {
            center_x: c.x,
            center_y: c.y,
        }
    }
}

/// Directions in which the head has left the box this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadZone {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl HeadZone {
    pub fn is_centered(&self) -> bool {
        !(self.left || self.right || self.up || self.down)
    }
}

/// Classify a centroid against a baseline box.
///
/// The box is centered on the baseline with half-extent
/// `face_width * box_scale` on both axes. Image y grows downward, so a
/// larger y is `down`. Without a baseline the centroid becomes the baseline
/// and nothing is reported.
pub fn classify(
    centroid: Centroid,
    face_width: f64,
    baseline: Option<HeadBaseline>,
    box_scale: f64,
) -> (HeadZone, HeadBaseline) {
    let Some(baseline) = baseline else {
        return (HeadZone::default(), centroid.into());
    };

    let half = face_width * box_scale;
    let dx = centroid.x - baseline.center_x;
    let dy = centroid.y - baseline.center_y;

    let zone = HeadZone {
        left: dx < -half,
        right: dx > half,
        up: dy < -half,
        down: dy > half,
    };
    (zone, baseline)
}

/// Stateful head zone detector.
///
/// The baseline is set from the first frame and changes only on an explicit
/// reset or recenter.
#[derive(Debug, Clone)]
pub struct HeadZoneDetector {
    box_scale: f64,
    baseline: Option<HeadBaseline>,
}

impl HeadZoneDetector {
    pub fn new(box_scale: f64) -> Self {
        Self {
            box_scale,
            baseline: None,
        }
    }

    pub fn update(&mut self, centroid: Centroid, face_width: f64) -> HeadZone {
        let anchoring = self.baseline.is_none();
        let (zone, baseline) = classify(centroid, face_width, self.baseline, self.box_scale);
        if anchoring {
            info!(
                center_x = baseline.center_x,
                center_y = baseline.center_y,
                "Head baseline anchored"
            );
        }
        self.baseline = Some(baseline);
        zone
    }

    /// Re-anchor on the next frame
    pub fn reset(&mut self) {
        self.baseline = None;
    }

    /// Replace the baseline immediately
    pub fn recenter(&mut self, baseline: HeadBaseline) {
        info!(
            center_x = baseline.center_x,
            center_y = baseline.center_y,
            "Head baseline recentered"
        );
        self.baseline = Some(baseline);
    }

    pub fn baseline(&self) -> Option<HeadBaseline> {
        self.baseline
    }
}
