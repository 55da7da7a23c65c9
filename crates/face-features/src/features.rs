//! Per-frame geometric metrics

use crate::landmarks::{index, Landmark, LandmarkFrame, REQUIRED_LANDMARKS};
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Distances at or below this are treated as zero
const MIN_DISTANCE: f64 = 1e-9;

/// Mean landmark position in the image plane
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

impl Centroid {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Raw metrics for one frame. Nothing here is smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceMetrics {
    /// Left eye lid distance / corner distance (lower = more closed)
    pub left_eye_ratio: f64,
    /// Right eye lid distance / corner distance
    pub right_eye_ratio: f64,
    /// Distance between inner upper and lower lip
    pub mouth_open: f64,
    /// Distance between mouth corners
    pub mouth_width: f64,
    /// Cheek-to-cheek distance in the image plane
    pub face_width: f64,
    /// Horizontal extent between the temple landmarks
    pub face_span: f64,
    /// Mean of all landmark positions
    pub centroid: Centroid,
}

impl FaceMetrics {
    /// Joint openness of both eyes
    pub fn eye_ratio(&self) -> f64 {
        (self.left_eye_ratio + self.right_eye_ratio) / 2.0
    }

    /// Mouth width relative to face width
    pub fn smile_ratio(&self) -> f64 {
        self.mouth_width / self.face_width
    }

    /// Mouth opening relative to face width
    pub fn mouth_open_ratio(&self) -> f64 {
        self.mouth_open / self.face_width
    }
}

fn point(frame: &LandmarkFrame, index: usize) -> Result<&Landmark, FeatureError> {
    frame.get(index).ok_or(FeatureError::MalformedFrame {
        required: REQUIRED_LANDMARKS,
        actual: frame.len(),
    })
}

fn non_zero(value: f64, what: &'static str) -> Result<f64, FeatureError> {
    if value > MIN_DISTANCE {
        Ok(value)
    } else {
        Err(FeatureError::DegenerateGeometry(what))
    }
}

fn eye_ratio(
    frame: &LandmarkFrame,
    upper: usize,
    lower: usize,
    outer: usize,
    inner: usize,
) -> Result<f64, FeatureError> {
    let vertical = point(frame, upper)?.distance(point(frame, lower)?);
    let horizontal = non_zero(
        point(frame, outer)?.distance(point(frame, inner)?),
        "eye corner distance",
    )?;
    Ok(vertical / horizontal)
}

/// Compute all metrics for a frame.
///
/// Fails if the frame has fewer than [`REQUIRED_LANDMARKS`] points, holds a
/// non-finite coordinate, or a normalizing distance is zero.
pub fn extract_metrics(frame: &LandmarkFrame) -> Result<FaceMetrics, FeatureError> {
    if frame.len() < REQUIRED_LANDMARKS {
        return Err(FeatureError::MalformedFrame {
            required: REQUIRED_LANDMARKS,
            actual: frame.len(),
        });
    }
    if let Some(index) = frame.points().iter().position(|p| !p.is_finite()) {
        return Err(FeatureError::NonFiniteLandmark { index });
    }

    let left_eye_ratio = eye_ratio(
        frame,
        index::LEFT_EYE_UPPER,
        index::LEFT_EYE_LOWER,
        index::LEFT_EYE_OUTER,
        index::LEFT_EYE_INNER,
    )?;
    let right_eye_ratio = eye_ratio(
        frame,
        index::RIGHT_EYE_UPPER,
        index::RIGHT_EYE_LOWER,
        index::RIGHT_EYE_OUTER,
        index::RIGHT_EYE_INNER,
    )?;

    let mouth_open =
        point(frame, index::UPPER_LIP)?.planar_distance(point(frame, index::LOWER_LIP)?);
    let mouth_width =
        point(frame, index::MOUTH_LEFT)?.planar_distance(point(frame, index::MOUTH_RIGHT)?);

    let face_left = point(frame, index::FACE_LEFT)?;
    let face_right = point(frame, index::FACE_RIGHT)?;
    let face_width = non_zero(face_left.planar_distance(face_right), "face width")?;
    let face_span = non_zero((face_right.x - face_left.x).abs(), "face span")?;

    let n = frame.len() as f64;
    let (sum_x, sum_y) = frame
        .points()
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let centroid = Centroid::new(sum_x / n, sum_y / n);

    trace!(
        left_eye_ratio,
        right_eye_ratio,
        mouth_open,
        face_width,
        "Extracted face metrics"
    );

    Ok(FaceMetrics {
        left_eye_ratio,
        right_eye_ratio,
        mouth_open,
        mouth_width,
        face_width,
        face_span,
        centroid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticFace;

    #[test]
    fn test_eye_ratio_from_synthetic_face() {
        let frame = SyntheticFace::default()
            .left_eye_ratio(0.3)
            .right_eye_ratio(0.05)
            .build();
        let metrics = extract_metrics(&frame).unwrap();

        assert!((metrics.left_eye_ratio - 0.3).abs() < 1e-9);
        assert!((metrics.right_eye_ratio - 0.05).abs() < 1e-9);
        assert!((metrics.eye_ratio() - 0.175).abs() < 1e-9);
    }

    #[test]
    fn test_eye_ratio_uses_depth() {
        let mut frame = SyntheticFace::default().eye_ratio(0.2).build();
        let upper = *frame.get(index::LEFT_EYE_UPPER).unwrap();
        let lower = *frame.get(index::LEFT_EYE_LOWER).unwrap();
        let vertical = upper.distance(&lower);

        // Push the lower lid back in z by the same amount as the lid gap
        frame.set(
            index::LEFT_EYE_LOWER,
            Landmark::new(lower.x, lower.y, lower.z + vertical),
        );
        let metrics = extract_metrics(&frame).unwrap();
        assert!((metrics.left_eye_ratio - 0.2 * 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_mouth_and_smile() {
        let frame = SyntheticFace::default()
            .face_width(0.5)
            .mouth_width(0.25)
            .mouth_open(0.08)
            .build();
        let metrics = extract_metrics(&frame).unwrap();

        assert!((metrics.face_width - 0.5).abs() < 1e-9);
        assert!((metrics.face_span - 0.5).abs() < 1e-9);
        assert!((metrics.smile_ratio() - 0.5).abs() < 1e-9);
        assert!((metrics.mouth_open - 0.08).abs() < 1e-9);
        assert!((metrics.mouth_open_ratio() - 0.16).abs() < 1e-9);
    }

    #[test]
    fn test_centroid_follows_face() {
        let centered = extract_metrics(&SyntheticFace::default().center(0.5, 0.5).build()).unwrap();
        let moved = extract_metrics(&SyntheticFace::default().center(0.6, 0.45).build()).unwrap();

        assert!((centered.centroid.x - 0.5).abs() < 1e-9);
        assert!((moved.centroid.x - centered.centroid.x - 0.1).abs() < 1e-9);
        assert!((moved.centroid.y - centered.centroid.y + 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_too_few_landmarks() {
        let frame = LandmarkFrame::new(vec![Landmark::default(); 100]);
        assert_eq!(
            extract_metrics(&frame).unwrap_err(),
            FeatureError::MalformedFrame {
                required: REQUIRED_LANDMARKS,
                actual: 100
            }
        );
    }

    #[test]
    fn test_collapsed_face_is_degenerate() {
        let frame = LandmarkFrame::new(vec![Landmark::new(0.5, 0.5, 0.0); REQUIRED_LANDMARKS]);
        assert!(matches!(
            extract_metrics(&frame),
            Err(FeatureError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_zero_face_width_is_degenerate() {
        let mut frame = SyntheticFace::default().build();
        let left = *frame.get(index::FACE_LEFT).unwrap();
        frame.set(index::FACE_RIGHT, left);

        assert_eq!(
            extract_metrics(&frame).unwrap_err(),
            FeatureError::DegenerateGeometry("face width")
        );
    }

    #[test]
    fn test_nan_rejected() {
        let mut frame = SyntheticFace::default().build();
        frame.set(7, Landmark::new(f64::NAN, 0.5, 0.0));

        assert_eq!(
            extract_metrics(&frame).unwrap_err(),
            FeatureError::NonFiniteLandmark { index: 7 }
        );
    }
}
