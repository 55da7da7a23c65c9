//! Signal detector configuration

use crate::SignalError;
use metric_window::MAX_WINDOW_SIZE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest accepted `history_len`
pub const MAX_HISTORY_LEN: usize = 1024;

/// How the mouth-open distance is compared against its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouthOpenMode {
    /// Raw lip distance in normalized image units
    #[default]
    Absolute,
    /// Lip distance divided by face width
    FaceWidth,
}

/// Signal detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Samples per smoothing window
    pub window_size: usize,

    /// Smoothed eye ratio below this counts as closed
    pub closed_threshold: f64,

    /// Closures shorter than this are blinks (milliseconds)
    pub max_blink_duration_ms: u64,

    /// Closure length that activates (milliseconds)
    pub activation_duration_ms: u64,

    /// Mouth-open threshold (distance or ratio, see `mouth_open_mode`)
    pub mouth_open_threshold: f64,

    pub mouth_open_mode: MouthOpenMode,

    /// Mouth width / face width above this counts as a smile
    pub smile_ratio_threshold: f64,

    /// Head box half-extent as a fraction of face width
    pub head_box_scale: f64,

    /// Non-empty signal sets kept for inspection
    pub history_len: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            closed_threshold: 0.1,
            max_blink_duration_ms: 500,
            activation_duration_ms: 3000,
            mouth_open_threshold: 0.05,
            mouth_open_mode: MouthOpenMode::Absolute,
            smile_ratio_threshold: 0.40,
            head_box_scale: 0.5,
            history_len: 10,
        }
    }
}

impl SignalConfig {
    /// Create responsive config (short window, quicker holds)
    pub fn responsive() -> Self {
        Self {
            window_size: 5,
            max_blink_duration_ms: 400,
            activation_duration_ms: 2000,
            ..Default::default()
        }
    }

    /// Create steady config (long window, slower holds)
    pub fn steady() -> Self {
        Self {
            window_size: 15,
            max_blink_duration_ms: 700,
            activation_duration_ms: 4000,
            ..Default::default()
        }
    }

    pub fn max_blink_duration(&self) -> Duration {
        Duration::from_millis(self.max_blink_duration_ms)
    }

    pub fn activation_duration(&self) -> Duration {
        Duration::from_millis(self.activation_duration_ms)
    }

    /// Reject values the detector cannot run with
    pub fn validate(&self) -> Result<(), SignalError> {
        if self.window_size == 0 {
            return Err(SignalError::Config("window_size must be at least 1".into()));
        }
        if self.window_size > MAX_WINDOW_SIZE {
            return Err(SignalError::Config(format!(
                "window_size must be at most {MAX_WINDOW_SIZE}, got {}",
                self.window_size
            )));
        }
        if self.history_len > MAX_HISTORY_LEN {
            return Err(SignalError::Config(format!(
                "history_len must be at most {MAX_HISTORY_LEN}, got {}",
                self.history_len
            )));
        }
        let positive = [
            ("closed_threshold", self.closed_threshold),
            ("mouth_open_threshold", self.mouth_open_threshold),
            ("smile_ratio_threshold", self.smile_ratio_threshold),
            ("head_box_scale", self.head_box_scale),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SignalError::Config(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.activation_duration_ms < self.max_blink_duration_ms {
            return Err(SignalError::Config(format!(
                "activation_duration_ms ({}) is shorter than max_blink_duration_ms ({})",
                self.activation_duration_ms, self.max_blink_duration_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SignalConfig::default();
        assert_eq!(config.window_size, 10);
        assert_eq!(config.closed_threshold, 0.1);
        assert_eq!(config.max_blink_duration(), Duration::from_millis(500));
        assert_eq!(config.activation_duration(), Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(SignalConfig::responsive().validate().is_ok());
        assert!(SignalConfig::steady().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config: SignalConfig =
            serde_json::from_str(r#"{"closed_threshold": 0.12, "mouth_open_mode": "face_width"}"#)
                .unwrap();

        assert_eq!(config.closed_threshold, 0.12);
        assert_eq!(config.mouth_open_mode, MouthOpenMode::FaceWidth);
        assert_eq!(config.window_size, 10);
        assert_eq!(config.activation_duration_ms, 3000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_window = SignalConfig {
            window_size: 0,
            ..Default::default()
        };
        assert!(matches!(zero_window.validate(), Err(SignalError::Config(_))));

        let huge_window = SignalConfig {
            window_size: usize::MAX,
            ..Default::default()
        };
        assert!(matches!(huge_window.validate(), Err(SignalError::Config(_))));

        let huge_history = SignalConfig {
            history_len: MAX_HISTORY_LEN + 1,
            ..Default::default()
        };
        assert!(huge_history.validate().is_err());

        let largest = SignalConfig {
            window_size: MAX_WINDOW_SIZE,
            history_len: MAX_HISTORY_LEN,
            ..Default::default()
        };
        assert!(largest.validate().is_ok());

        let negative = SignalConfig {
            closed_threshold: -0.1,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let nan_scale = SignalConfig {
            head_box_scale: f64::NAN,
            ..Default::default()
        };
        assert!(nan_scale.validate().is_err());

        let inverted = SignalConfig {
            max_blink_duration_ms: 800,
            activation_duration_ms: 600,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
    }
}
