//! Eye hold state machine
//!
//! Separates deliberate sustained eye closures from blinks using elapsed
//! time only. Each closure episode moves through
//! `Open -> Closing -> Held -> Activated` and emits at most one pulse per
//! frame:
//! - `Closed` when the closure outlasts the blink limit
//! - `Activate` when it outlasts the activation duration
//! - `Failed` when a held closure is released before activating

use crate::SignalConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Discrete eye events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EyePulse {
    /// Closure confirmed as deliberate (not a blink)
    Closed,
    /// Confirmed closure released before activation
    Failed,
    /// Closure held long enough to activate
    Activate,
}

/// Where the current episode stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EyeHoldPhase {
    #[default]
    Open,
    Closing,
    Held,
    Activated,
}

/// Per-session eye hold state (both eyes evaluated jointly).
///
/// `closure_started_at` is set if and only if `in_closed` is true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeHoldState {
    pub in_closed: bool,
    pub closure_started_at: Option<Duration>,
    pub closed_pulse_sent: bool,
    pub activated: bool,
    pub valid_closure_confirmed: bool,
}

impl EyeHoldState {
    pub fn phase(&self) -> EyeHoldPhase {
        if !self.in_closed {
            EyeHoldPhase::Open
        } else if self.activated {
            EyeHoldPhase::Activated
        } else if self.valid_closure_confirmed {
            EyeHoldPhase::Held
        } else {
            EyeHoldPhase::Closing
        }
    }
}

/// Hold-to-activate detector over the smoothed joint eye ratio
#[derive(Debug, Clone)]
pub struct EyeHoldMachine {
    closed_threshold: f64,
    max_blink: Duration,
    activation: Duration,
    state: EyeHoldState,
    /// First frame of the current measurement gap, if any
    suspended_at: Option<Duration>,
}

impl EyeHoldMachine {
    pub fn new(config: &SignalConfig) -> Self {
        Self {
            closed_threshold: config.closed_threshold,
            max_blink: config.max_blink_duration(),
            activation: config.activation_duration(),
            state: EyeHoldState::default(),
            suspended_at: None,
        }
    }

    /// Feed one measured frame and return the pulse it triggers, if any
    pub fn update(&mut self, smoothed_ratio: f64, now: Duration) -> Option<EyePulse> {
        self.resume(now);

        let closed = smoothed_ratio < self.closed_threshold;
        match (self.state.in_closed, closed) {
            (false, false) => None,
            (false, true) => {
                self.state = EyeHoldState {
                    in_closed: true,
                    closure_started_at: Some(now),
                    ..EyeHoldState::default()
                };
                debug!(ratio = smoothed_ratio, at = ?now, "Eye closure episode started");
                None
            }
            (true, true) => self.advance(now),
            (true, false) => self.release(now),
        }
    }

    /// Mark a frame without a usable measurement.
    ///
    /// Episode timers stop until the next measured frame; no episode starts
    /// or ends on missing data.
    pub fn suspend(&mut self, now: Duration) {
        if self.state.in_closed && self.suspended_at.is_none() {
            debug!(at = ?now, "Eye episode suspended, measurement lost");
            self.suspended_at = Some(now);
        }
    }

    pub fn state(&self) -> &EyeHoldState {
        &self.state
    }

    pub fn phase(&self) -> EyeHoldPhase {
        self.state.phase()
    }

    /// Time spent in the current episode, excluding measurement gaps
    pub fn closed_for(&self, now: Duration) -> Option<Duration> {
        let start = self.state.closure_started_at?;
        let end = self.suspended_at.unwrap_or(now);
        Some(end.saturating_sub(start))
    }

    /// Drop the current episode (on session reset)
    pub fn reset(&mut self) {
        self.state = EyeHoldState::default();
        self.suspended_at = None;
    }

    /// Shift the episode start past a measurement gap
    fn resume(&mut self, now: Duration) {
        let Some(paused) = self.suspended_at.take() else {
            return;
        };
        if let Some(start) = self.state.closure_started_at.as_mut() {
            let gap = now.saturating_sub(paused);
            *start += gap;
            debug!(gap = ?gap, "Eye episode resumed");
        }
    }

    fn advance(&mut self, now: Duration) -> Option<EyePulse> {
        let start = self.state.closure_started_at?;
        let elapsed = now.saturating_sub(start);

        if !self.state.closed_pulse_sent {
            if elapsed >= self.max_blink {
                self.state.closed_pulse_sent = true;
                self.state.valid_closure_confirmed = true;
                info!(elapsed = ?elapsed, "Eye hold confirmed");
                return Some(EyePulse::Closed);
            }
            return None;
        }

        if !self.state.activated && elapsed >= self.activation {
            self.state.activated = true;
            info!(elapsed = ?elapsed, "Eye hold activated");
            return Some(EyePulse::Activate);
        }

        None
    }

    fn release(&mut self, now: Duration) -> Option<EyePulse> {
        let pulse = match self.state.phase() {
            EyeHoldPhase::Held => {
                info!(at = ?now, "Eye hold released before activation");
                Some(EyePulse::Failed)
            }
            EyeHoldPhase::Closing => {
                debug!(at = ?now, "Blink ignored");
                None
            }
            EyeHoldPhase::Activated | EyeHoldPhase::Open => None,
        };
        self.state = EyeHoldState::default();
        pulse
    }
}
