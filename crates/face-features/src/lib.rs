//! Face Feature Extraction
//!
//! Turns one frame of normalized face landmarks into the scalar metrics the
//! signal detector consumes:
//! - Eye openness ratio (per eye)
//! - Mouth-open distance and mouth width
//! - Face width and horizontal face span
//! - Face centroid

mod features;
pub mod landmarks;
pub mod synthetic;

pub use features::{extract_metrics, Centroid, FaceMetrics};
pub use landmarks::{Landmark, LandmarkFrame, REQUIRED_LANDMARKS};

use thiserror::Error;

/// Feature extraction errors.
///
/// Every variant means the frame must be skipped as "no detection".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("Malformed frame: need at least {required} landmarks, got {actual}")]
    MalformedFrame { required: usize, actual: usize },

    #[error("Degenerate geometry: {0} is zero")]
    DegenerateGeometry(&'static str),

    #[error("Landmark {index} has a non-finite coordinate")]
    NonFiniteLandmark { index: usize },
}
