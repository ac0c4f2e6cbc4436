//! Fixed-capacity voice pool with oldest-voice reclamation
//!
//! Bounds the number of simultaneously playing samples. Finished voices are
//! reaped on every trigger; when the pool is full the oldest playing voice
//! is stopped and its slot reused, so the newest keystroke always gets a
//! voice.

use std::collections::VecDeque;

/// Default number of simultaneous mixing voices.
pub const DEFAULT_VOICES: usize = 32;

/// One playing slot. Implementations wrap whatever the audio backend hands
/// out for an in-flight sample.
pub trait Voice {
    /// True once the sample has finished playing.
    fn is_done(&self) -> bool;

    /// Stop playback immediately. Must be idempotent.
    fn stop(&self);
}

/// Pool of in-flight voices, ordered oldest-first.
#[derive(Debug)]
pub struct VoicePool<V> {
    capacity: usize,
    active: VecDeque<V>,
}

impl<V: Voice> VoicePool<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            active: VecDeque::new(),
        }
    }

    /// Start a new voice, reclaiming the oldest one if the pool is full.
    ///
    /// `start` is only invoked once a slot is guaranteed, so a failed start
    /// never costs an existing voice more than the reclaimed one.
    pub fn trigger<E>(&mut self, start: impl FnOnce() -> Result<V, E>) -> Result<(), E> {
        self.active.retain(|v| !v.is_done());

        if self.active.len() >= self.capacity {
            if let Some(oldest) = self.active.pop_front() {
                oldest.stop();
            }
        }

        self.active.push_back(start()?);
        Ok(())
    }

    /// Number of voices still playing.
    pub fn active_voices(&mut self) -> usize {
        self.active.retain(|v| !v.is_done());
        self.active.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stop every voice and empty the pool.
    pub fn stop_all(&mut self) {
        for voice in self.active.drain(..) {
            voice.stop();
        }
    }
}

impl<V: Voice> Default for VoicePool<V> {
    fn default() -> Self {
        Self::new(DEFAULT_VOICES)
    }
}
