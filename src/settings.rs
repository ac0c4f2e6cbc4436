//! Live settings state shared between the event and control contexts
//!
//! A single [`Settings`] record behind an `RwLock`. The event context takes
//! a cheap snapshot per key event instead of holding the lock across
//! playback; the control context mutates through narrow setters. Readers
//! tolerate values changing between one event and the next.

use crate::config::Settings;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle to the shared settings record.
#[derive(Clone)]
pub struct SharedSettings {
    inner: Arc<RwLock<Settings>>,
}

impl SharedSettings {
    /// Wrap an initial settings record, clamping the persisted volume.
    pub fn new(mut initial: Settings) -> Self {
        initial.volume = initial.volume.clamp(0.0, 1.0);
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Clone of the current record. One snapshot covers one key event.
    pub fn snapshot(&self) -> Settings {
        self.inner.read().clone()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.write().enabled = enabled;
    }

    pub fn set_prevent_repeats(&self, prevent: bool) {
        self.inner.write().prevent_repeats = prevent;
    }

    /// Set master volume, clamped to [0.0, 1.0] on write.
    pub fn set_volume(&self, volume: f32) {
        self.inner.write().volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_theme(&self, name: impl Into<String>) {
        self.inner.write().theme = name.into();
    }
}

impl Default for SharedSettings {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
