//! Thread-safe detector handle for callback-driven landmark sources

use crate::head_zone::HeadBaseline;
use crate::signals::SignalSet;
use crate::{SignalDetector, SignalError};
use face_features::LandmarkFrame;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Cloneable handle to one [`SignalDetector`].
///
/// Each call holds the lock for the whole extract, smooth, and update
/// sequence of a frame, so two frames never interleave inside the detector.
#[derive(Clone)]
pub struct SharedDetector {
    inner: Arc<Mutex<SignalDetector>>,
}

impl SharedDetector {
    pub fn new(detector: SignalDetector) -> Self {
        Self {
            inner: Arc::new(Mutex::new(detector)),
        }
    }

    /// Process one frame result (see [`SignalDetector::process`])
    pub fn process(
        &self,
        timestamp: Duration,
        face: Option<&LandmarkFrame>,
    ) -> Result<SignalSet, SignalError> {
        self.lock().process(timestamp, face)
    }

    pub fn reset_baseline(&self) {
        self.lock().reset_baseline();
    }

    pub fn recenter(&self, baseline: HeadBaseline) {
        self.lock().recenter(baseline);
    }

    pub fn reset_session(&self) {
        self.lock().reset_session();
    }

    /// Run `f` with exclusive access to the detector
    pub fn with<R>(&self, f: impl FnOnce(&mut SignalDetector) -> R) -> R {
        f(&mut self.lock())
    }

    // Detector state is consistent between frames, so a poisoned lock stays usable
    fn lock(&self) -> MutexGuard<'_, SignalDetector> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<SignalDetector> for SharedDetector {
    fn from(detector: SignalDetector) -> Self {
        Self::new(detector)
    }
}
