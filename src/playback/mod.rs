//! Playback engine: bounded polyphonic sample triggering
//!
//! Given a resolved sample path and the current master volume, starts
//! non-blocking playback through a fixed-size pool of mixing voices. The
//! caller never waits for completion, and a full pool reclaims its oldest
//! voice so rapid typing keeps audible feedback for the latest keystroke.

pub mod backend;
pub mod pool;

pub use backend::{AudioBackend, RodioBackend};
pub use pool::{Voice, VoicePool, DEFAULT_VOICES};

use crate::error::PlaybackError;
use parking_lot::Mutex;
use std::path::Path;

/// Triggers samples through a voice pool over an audio backend.
pub struct PlaybackEngine<B: AudioBackend> {
    backend: B,
    pool: Mutex<VoicePool<B::Voice>>,
}

impl<B: AudioBackend> PlaybackEngine<B> {
    pub fn new(backend: B, voices: usize) -> Self {
        Self {
            backend,
            pool: Mutex::new(VoicePool::new(voices)),
        }
    }

    /// Fire-and-forget playback of `sample` at `volume`.
    ///
    /// Concurrent triggers are safe; the pool lock is held only for the
    /// voice bookkeeping and the backend start call, never for playback.
    pub fn play(&self, sample: &Path, volume: f32) -> Result<(), PlaybackError> {
        self.pool
            .lock()
            .trigger(|| self.backend.start(sample, volume))
    }

    /// Number of voices still playing.
    pub fn active_voices(&self) -> usize {
        self.pool.lock().active_voices()
    }

    /// Stop all in-flight voices.
    pub fn stop_all(&self) {
        self.pool.lock().stop_all();
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Engine wired to the default rodio output device.
pub fn rodio_engine() -> Result<PlaybackEngine<RodioBackend>, PlaybackError> {
    Ok(PlaybackEngine::new(RodioBackend::new()?, DEFAULT_VOICES))
}
