//! Synthetic face frames with exactly known geometry.
//!
//! Used for tests, benchmarks, and generated replay streams. Every landmark
//! the extractor does not read sits on the face center, and the face is
//! mirror-symmetric in x, so the centroid x equals the center x.

use crate::landmarks::{index, Landmark, LandmarkFrame};

/// Landmark count of the standard face mesh
pub const FACE_MESH_LANDMARKS: usize = 468;

/// Builder for a posed synthetic face
#[derive(Debug, Clone, Copy)]
pub struct SyntheticFace {
    center_x: f64,
    center_y: f64,
    face_width: f64,
    left_eye_ratio: f64,
    right_eye_ratio: f64,
    mouth_width: f64,
    mouth_open: f64,
    landmarks: usize,
}

impl Default for SyntheticFace {
    fn default() -> Self {
        Self {
            center_x: 0.5,
            center_y: 0.5,
            face_width: 0.4,
            left_eye_ratio: 0.3,
            right_eye_ratio: 0.3,
            mouth_width: 0.14,
            mouth_open: 0.01,
            landmarks: FACE_MESH_LANDMARKS,
        }
    }
}

impl SyntheticFace {
    pub fn center(mut self, x: f64, y: f64) -> Self {
        self.center_x = x;
        self.center_y = y;
        self
    }

    pub fn face_width(mut self, width: f64) -> Self {
        self.face_width = width;
        self
    }

    /// Same openness ratio for both eyes
    pub fn eye_ratio(self, ratio: f64) -> Self {
        self.left_eye_ratio(ratio).right_eye_ratio(ratio)
    }

    pub fn left_eye_ratio(mut self, ratio: f64) -> Self {
        self.left_eye_ratio = ratio;
        self
    }

    pub fn right_eye_ratio(mut self, ratio: f64) -> Self {
        self.right_eye_ratio = ratio;
        self
    }

    pub fn mouth_width(mut self, width: f64) -> Self {
        self.mouth_width = width;
        self
    }

    pub fn mouth_open(mut self, distance: f64) -> Self {
        self.mouth_open = distance;
        self
    }

    /// Total landmark count (values below the required count give a malformed frame)
    pub fn landmarks(mut self, count: usize) -> Self {
        self.landmarks = count;
        self
    }

    pub fn build(&self) -> LandmarkFrame {
        let (cx, cy, w) = (self.center_x, self.center_y, self.face_width);
        let mut frame =
            LandmarkFrame::new(vec![Landmark::new(cx, cy, 0.0); self.landmarks.max(1)]);

        let eye_y = cy - 0.1 * w;
        let eye_width = 0.2 * w;

        // Left eye spans [cx - 0.3w, cx - 0.1w], right eye mirrors it
        frame.set(index::LEFT_EYE_OUTER, Landmark::new(cx - 0.3 * w, eye_y, 0.0));
        frame.set(index::LEFT_EYE_INNER, Landmark::new(cx - 0.1 * w, eye_y, 0.0));
        frame.set(index::RIGHT_EYE_INNER, Landmark::new(cx + 0.1 * w, eye_y, 0.0));
        frame.set(index::RIGHT_EYE_OUTER, Landmark::new(cx + 0.3 * w, eye_y, 0.0));

        let left_gap = self.left_eye_ratio * eye_width / 2.0;
        frame.set(index::LEFT_EYE_UPPER, Landmark::new(cx - 0.2 * w, eye_y - left_gap, 0.0));
        frame.set(index::LEFT_EYE_LOWER, Landmark::new(cx - 0.2 * w, eye_y + left_gap, 0.0));

        let right_gap = self.right_eye_ratio * eye_width / 2.0;
        frame.set(index::RIGHT_EYE_UPPER, Landmark::new(cx + 0.2 * w, eye_y - right_gap, 0.0));
        frame.set(index::RIGHT_EYE_LOWER, Landmark::new(cx + 0.2 * w, eye_y + right_gap, 0.0));

        let mouth_y = cy + 0.25 * w;
        let half_mouth = self.mouth_width / 2.0;
        frame.set(index::MOUTH_LEFT, Landmark::new(cx - half_mouth, mouth_y, 0.0));
        frame.set(index::MOUTH_RIGHT, Landmark::new(cx + half_mouth, mouth_y, 0.0));

        let half_open = self.mouth_open / 2.0;
        frame.set(index::UPPER_LIP, Landmark::new(cx, mouth_y - half_open, 0.0));
        frame.set(index::LOWER_LIP, Landmark::new(cx, mouth_y + half_open, 0.0));

        frame.set(index::FACE_LEFT, Landmark::new(cx - w / 2.0, cy, 0.0));
        frame.set(index::FACE_RIGHT, Landmark::new(cx + w / 2.0, cy, 0.0));

        frame
    }
}
