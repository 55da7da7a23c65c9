//! Stateless per-frame expression classification

use crate::config::{MouthOpenMode, SignalConfig};
use face_features::FaceMetrics;
use serde::{Deserialize, Serialize};

/// Which eyes are closed this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EyeExpression {
    #[default]
    Open,
    BothClosed,
    LeftClosed,
    RightClosed,
}

impl EyeExpression {
    /// Classify per-eye ratios; a ratio below `closed_threshold` is closed
    pub fn classify(left_ratio: f64, right_ratio: f64, closed_threshold: f64) -> Self {
        match (left_ratio < closed_threshold, right_ratio < closed_threshold) {
            (true, true) => Self::BothClosed,
            (true, false) => Self::LeftClosed,
            (false, true) => Self::RightClosed,
            (false, false) => Self::Open,
        }
    }

    /// Exactly one eye closed
    pub fn is_wink(&self) -> bool {
        matches!(self, Self::LeftClosed | Self::RightClosed)
    }
}

/// Mouth state for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouthExpression {
    pub mouth_open: bool,
    pub smile: bool,
}

/// Threshold classifier for mouth-open and smile. Not smoothed.
#[derive(Debug, Clone)]
pub struct ExpressionClassifier {
    mouth_open_threshold: f64,
    mouth_open_mode: MouthOpenMode,
    smile_ratio_threshold: f64,
}

impl ExpressionClassifier {
    pub fn new(config: &SignalConfig) -> Self {
        Self {
            mouth_open_threshold: config.mouth_open_threshold,
            mouth_open_mode: config.mouth_open_mode,
            smile_ratio_threshold: config.smile_ratio_threshold,
        }
    }

    pub fn classify(&self, metrics: &FaceMetrics) -> MouthExpression {
        let open_measure = match self.mouth_open_mode {
            MouthOpenMode::Absolute => metrics.mouth_open,
            MouthOpenMode::FaceWidth => metrics.mouth_open_ratio(),
        };
        MouthExpression {
            mouth_open: open_measure > self.mouth_open_threshold,
            smile: metrics.smile_ratio() > self.smile_ratio_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use face_features::{extract_metrics, synthetic::SyntheticFace};

    fn metrics(face: SyntheticFace) -> FaceMetrics {
        extract_metrics(&face.build()).unwrap()
    }

    #[test]
    fn test_eye_expression() {
        assert_eq!(EyeExpression::classify(0.3, 0.3, 0.1), EyeExpression::Open);
        assert_eq!(EyeExpression::classify(0.05, 0.02, 0.1), EyeExpression::BothClosed);
        assert_eq!(EyeExpression::classify(0.05, 0.3, 0.1), EyeExpression::LeftClosed);
        assert_eq!(EyeExpression::classify(0.3, 0.05, 0.1), EyeExpression::RightClosed);
        assert!(EyeExpression::LeftClosed.is_wink());
        assert!(!EyeExpression::BothClosed.is_wink());
    }

    #[test]
    fn test_neutral_face() {
        let classifier = ExpressionClassifier::new(&SignalConfig::default());
        let expression = classifier.classify(&metrics(SyntheticFace::default()));
        assert_eq!(expression, MouthExpression::default());
    }

    #[test]
    fn test_mouth_open_absolute() {
        let classifier = ExpressionClassifier::new(&SignalConfig::default());

        let open = classifier.classify(&metrics(SyntheticFace::default().mouth_open(0.06)));
        assert!(open.mouth_open);

        let closed = classifier.classify(&metrics(SyntheticFace::default().mouth_open(0.04)));
        assert!(!closed.mouth_open);
    }

    #[test]
    fn test_mouth_open_normalized_ignores_distance_to_camera() {
        let config = SignalConfig {
            mouth_open_mode: MouthOpenMode::FaceWidth,
            mouth_open_threshold: 0.1,
            ..Default::default()
        };
        let classifier = ExpressionClassifier::new(&config);

        // Same expression, face near (wide) and far (narrow)
        let near = metrics(SyntheticFace::default().face_width(0.6).mouth_open(0.09));
        let far = metrics(SyntheticFace::default().face_width(0.2).mouth_open(0.03));
        assert!(classifier.classify(&near).mouth_open);
        assert!(classifier.classify(&far).mouth_open);

        // The absolute comparison disagrees for the far face
        let absolute = ExpressionClassifier::new(&SignalConfig::default());
        assert!(absolute.classify(&near).mouth_open);
        assert!(!absolute.classify(&far).mouth_open);
    }

    #[test]
    fn test_smile_ratio() {
        let classifier = ExpressionClassifier::new(&SignalConfig::default());

        let wide = metrics(SyntheticFace::default().face_width(0.4).mouth_width(0.18));
        assert!(classifier.classify(&wide).smile);

        let narrow = metrics(SyntheticFace::default().face_width(0.4).mouth_width(0.15));
        assert!(!classifier.classify(&narrow).smile);
    }
}
