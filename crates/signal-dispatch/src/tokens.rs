//! Signal-to-token mapping

use face_signals::{EyeExpression, SignalSet};
use serde::{Deserialize, Serialize};

/// One dispatchable signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    EyesClosed,
    EyesFailed,
    EyesActivate,
    MouthOpen,
    Smile,
    HeadLeft,
    HeadRight,
    HeadUp,
    HeadDown,
    LeftEyeClosed,
    RightEyeClosed,
}

impl Token {
    /// Pulses fire once per transition; everything else is a level
    pub fn is_pulse(&self) -> bool {
        matches!(self, Self::EyesClosed | Self::EyesFailed | Self::EyesActivate)
    }

    /// Tokens set in a signal set, pulses first
    pub fn collect(signals: &SignalSet) -> Vec<Token> {
        let flags = [
            (signals.eye_closed_pulse, Self::EyesClosed),
            (signals.eye_failed_pulse, Self::EyesFailed),
            (signals.eye_activate_pulse, Self::EyesActivate),
            (signals.mouth_open, Self::MouthOpen),
            (signals.smile, Self::Smile),
            (signals.head_left, Self::HeadLeft),
            (signals.head_right, Self::HeadRight),
            (signals.head_up, Self::HeadUp),
            (signals.head_down, Self::HeadDown),
            (
                signals.eye_expression == EyeExpression::LeftClosed,
                Self::LeftEyeClosed,
            ),
            (
                signals.eye_expression == EyeExpression::RightClosed,
                Self::RightEyeClosed,
            ),
        ];
        flags
            .into_iter()
            .filter_map(|(set, token)| set.then_some(token))
            .collect()
    }
}

/// Application-defined names for each token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenMap {
    pub eyes_closed: String,
    pub eyes_failed: String,
    pub eyes_activate: String,
    pub mouth_open: String,
    pub smile: String,
    pub head_left: String,
    pub head_right: String,
    pub head_up: String,
    pub head_down: String,
    pub left_eye_closed: String,
    pub right_eye_closed: String,
}

impl Default for TokenMap {
    fn default() -> Self {
        Self {
            eyes_closed: "EYES_CLOSED".into(),
            eyes_failed: "EYES_FAILED".into(),
            eyes_activate: "EYES_ACTIVATE".into(),
            mouth_open: "MOUTH_OPEN".into(),
            smile: "SMILE".into(),
            head_left: "HEAD_LEFT".into(),
            head_right: "HEAD_RIGHT".into(),
            head_up: "HEAD_UP".into(),
            head_down: "HEAD_DOWN".into(),
            left_eye_closed: "LEFT_EYE_CLOSED".into(),
            right_eye_closed: "RIGHT_EYE_CLOSED".into(),
        }
    }
}

impl TokenMap {
    pub fn name(&self, token: Token) -> &str {
        match token {
            Token::EyesClosed => &self.eyes_closed,
            Token::EyesFailed => &self.eyes_failed,
            Token::EyesActivate => &self.eyes_activate,
            Token::MouthOpen => &self.mouth_open,
            Token::Smile => &self.smile,
            Token::HeadLeft => &self.head_left,
            Token::HeadRight => &self.head_right,
            Token::HeadUp => &self.head_up,
            Token::HeadDown => &self.head_down,
            Token::LeftEyeClosed => &self.left_eye_closed,
            Token::RightEyeClosed => &self.right_eye_closed,
        }
    }
}
