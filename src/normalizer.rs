//! Key event normalization
//!
//! Collapses the raw OS key stream into discrete per-key transitions. The
//! normalizer owns the set of currently held keys and is the sole gate for
//! kernel auto-repeat: a held key delivers repeated presses with no release
//! in between, and whether those retrigger sound is decided here, per the
//! `prevent_repeats` setting. Releases never trigger sound.

use crate::config::Settings;
use crate::keys::{KeyEventKind, KeyId, RawKeyEvent};
use std::collections::HashSet;

/// What the normalizer decided about one raw event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Forward this press to the playback engine.
    Trigger(KeyId),
    /// Repeated press of a held key while repeat suppression is on.
    Suppressed,
    /// Nothing to play: a release, or a press while sounds are disabled.
    Ignored,
}

/// Tracks held keys across the raw event stream.
#[derive(Debug, Default)]
pub struct Normalizer {
    active: HashSet<KeyId>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one raw event against the current settings snapshot.
    ///
    /// The held-key set updates even while sounds are disabled so that
    /// re-enabling mid-hold does not misreport key state.
    pub fn normalize(&mut self, event: &RawKeyEvent, settings: &Settings) -> Normalized {
        match event.kind {
            KeyEventKind::Pressed => {
                if settings.prevent_repeats && self.active.contains(&event.key) {
                    return Normalized::Suppressed;
                }
                self.active.insert(event.key.clone());
                if settings.enabled {
                    Normalized::Trigger(event.key.clone())
                } else {
                    Normalized::Ignored
                }
            }
            KeyEventKind::Released => {
                // Idempotent: releases for keys we never saw pressed are fine
                self.active.remove(&event.key);
                Normalized::Ignored
            }
        }
    }

    /// Whether a key is currently considered held down.
    pub fn is_held(&self, key: &KeyId) -> bool {
        self.active.contains(key)
    }

    /// Number of keys currently held.
    pub fn held_count(&self) -> usize {
        self.active.len()
    }

    /// Clear the held-key set (startup and listener shutdown).
    pub fn reset(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(enabled: bool, prevent_repeats: bool) -> Settings {
        Settings {
            enabled,
            prevent_repeats,
            ..Settings::default()
        }
    }

    #[test]
    fn test_first_press_triggers() {
        let mut n = Normalizer::new();
        let s = settings(true, true);
        assert_eq!(
            n.normalize(&RawKeyEvent::pressed("a"), &s),
            Normalized::Trigger(KeyId::new("a"))
        );
        assert!(n.is_held(&KeyId::new("a")));
    }

    #[test]
    fn test_repeat_suppression_on() {
        let mut n = Normalizer::new();
        let s = settings(true, true);

        assert_eq!(
            n.normalize(&RawKeyEvent::pressed("a"), &s),
            Normalized::Trigger(KeyId::new("a"))
        );
        // Auto-repeat flood: exactly one trigger, the rest suppressed
        for _ in 0..10 {
            assert_eq!(n.normalize(&RawKeyEvent::pressed("a"), &s), Normalized::Suppressed);
        }
        assert_eq!(n.held_count(), 1);
    }

    #[test]
    fn test_repeat_suppression_off() {
        let mut n = Normalizer::new();
        let s = settings(true, false);

        // Every press retriggers, including auto-repeat
        for _ in 0..5 {
            assert_eq!(
                n.normalize(&RawKeyEvent::pressed("a"), &s),
                Normalized::Trigger(KeyId::new("a"))
            );
        }
    }

    #[test]
    fn test_release_clears_held_and_never_triggers() {
        let mut n = Normalizer::new();
        let s = settings(true, true);

        n.normalize(&RawKeyEvent::pressed("a"), &s);
        assert_eq!(n.normalize(&RawKeyEvent::released("a"), &s), Normalized::Ignored);
        assert!(!n.is_held(&KeyId::new("a")));

        // Press after release triggers again
        assert_eq!(
            n.normalize(&RawKeyEvent::pressed("a"), &s),
            Normalized::Trigger(KeyId::new("a"))
        );
    }

    #[test]
    fn test_release_without_press_is_idempotent() {
        let mut n = Normalizer::new();
        let s = settings(true, true);
        assert_eq!(n.normalize(&RawKeyEvent::released("q"), &s), Normalized::Ignored);
        assert_eq!(n.held_count(), 0);
    }

    #[test]
    fn test_active_set_tracks_last_transition() {
        let mut n = Normalizer::new();
        let s = settings(true, true);

        n.normalize(&RawKeyEvent::pressed("a"), &s);
        n.normalize(&RawKeyEvent::pressed("b"), &s);
        n.normalize(&RawKeyEvent::released("a"), &s);
        n.normalize(&RawKeyEvent::pressed("c"), &s);
        n.normalize(&RawKeyEvent::released("c"), &s);
        n.normalize(&RawKeyEvent::pressed("c"), &s);

        assert!(!n.is_held(&KeyId::new("a")));
        assert!(n.is_held(&KeyId::new("b")));
        assert!(n.is_held(&KeyId::new("c")));
        assert_eq!(n.held_count(), 2);
    }

    #[test]
    fn test_disabled_still_updates_active_set() {
        let mut n = Normalizer::new();
        let muted = settings(false, true);

        assert_eq!(n.normalize(&RawKeyEvent::pressed("a"), &muted), Normalized::Ignored);
        assert!(n.is_held(&KeyId::new("a")));

        // Re-enabling mid-hold: the held key still suppresses its repeats
        let live = settings(true, true);
        assert_eq!(n.normalize(&RawKeyEvent::pressed("a"), &live), Normalized::Suppressed);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut n = Normalizer::new();
        let s = settings(true, true);
        n.normalize(&RawKeyEvent::pressed("a"), &s);
        n.normalize(&RawKeyEvent::pressed("b"), &s);

        n.reset();
        assert_eq!(n.held_count(), 0);
        assert_eq!(
            n.normalize(&RawKeyEvent::pressed("a"), &s),
            Normalized::Trigger(KeyId::new("a"))
        );
    }
}
