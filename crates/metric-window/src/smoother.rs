//! Keyed Temporal Smoother

use crate::window::SlidingWindow;
use crate::WindowError;
use std::collections::HashMap;
use std::hash::Hash;

/// One sliding window per tracked metric.
///
/// Windows are created lazily on the first sample for a key and are never
/// shared between keys.
#[derive(Debug, Clone)]
pub struct Smoother<K> {
    /// Empty window cloned for each new metric
    template: SlidingWindow,
    windows: HashMap<K, SlidingWindow>,
}

impl<K> Smoother<K>
where
    K: Eq + Hash + Copy,
{
    /// Create a smoother whose windows hold `window_size` samples
    pub fn new(window_size: usize) -> Result<Self, WindowError> {
        Ok(Self {
            template: SlidingWindow::new(window_size)?,
            windows: HashMap::new(),
        })
    }

    /// Record a sample for `metric` and return the metric's current mean
    pub fn update(&mut self, metric: K, value: f64) -> f64 {
        let template = &self.template;
        self.windows
            .entry(metric)
            .or_insert_with(|| template.clone())
            .push(value)
    }

    /// Current mean for `metric`, `None` until it has a sample
    pub fn mean(&self, metric: K) -> Option<f64> {
        self.windows.get(&metric).and_then(SlidingWindow::mean)
    }

    /// Samples currently held for `metric`
    pub fn len(&self, metric: K) -> usize {
        self.windows.get(&metric).map_or(0, SlidingWindow::len)
    }

    /// Window capacity shared by all metrics
    pub fn window_size(&self) -> usize {
        self.template.capacity()
    }

    /// Drop every window
    pub fn reset(&mut self) {
        self.windows.clear();
    }
}
