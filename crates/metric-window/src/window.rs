//! Bounded Moving-Average Window

use crate::WindowError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default window capacity (10 frames, ~0.33s at 30fps)
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Largest accepted capacity (~34s at 30fps)
pub const MAX_WINDOW_SIZE: usize = 1024;

/// Fixed-capacity window over the most recent samples of one metric.
///
/// Pushing into a full window evicts the oldest sample. The mean is always
/// computed over the current contents and is `None` before the first sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlidingWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl SlidingWindow {
    /// Create a new window holding at most `capacity` samples
    pub fn new(capacity: usize) -> Result<Self, WindowError> {
        if capacity == 0 {
            return Err(WindowError::ZeroCapacity(capacity));
        }
        if capacity > MAX_WINDOW_SIZE {
            return Err(WindowError::TooLarge(capacity));
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Create a window with the default capacity (10 samples)
    pub fn with_default_capacity() -> Self {
        Self {
            samples: VecDeque::with_capacity(DEFAULT_WINDOW_SIZE),
            capacity: DEFAULT_WINDOW_SIZE,
        }
    }

    /// Push a sample (evicts the oldest if full) and return the new mean
    pub fn push(&mut self, value: f64) -> f64 {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);

        // Non-empty after the push above
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Arithmetic mean of the current contents
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    /// Most recently pushed sample
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if window is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Check if window is at capacity
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Get the window capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all samples
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
