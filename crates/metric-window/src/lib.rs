//! Sliding Window Smoothing
//!
//! Provides bounded moving-average windows for noisy per-frame metrics,
//! keyed by metric so every tracked signal owns exactly one window.

mod smoother;
mod window;

pub use smoother::Smoother;
pub use window::{SlidingWindow, DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE};

use thiserror::Error;

/// Window construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// A window must hold at least one sample
    #[error("Window capacity must be at least 1, got {0}")]
    ZeroCapacity(usize),

    #[error("Window capacity {0} exceeds the maximum of {max}", max = crate::MAX_WINDOW_SIZE)]
    TooLarge(usize),
}
