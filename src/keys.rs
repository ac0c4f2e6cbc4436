//! Key identity types shared by the listener, normalizer, and playback path.
//!
//! Listeners translate platform key codes into lowercase names ("space",
//! "delete", "a", ...) so the rest of the pipeline never touches platform
//! types. Equality is the only operation the pipeline needs.

use std::fmt;

/// Opaque identifier for a physical key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyId(String);

impl KeyId {
    pub fn new(name: impl Into<String>) -> Self {
        KeyId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyId {
    fn from(name: &str) -> Self {
        KeyId::new(name)
    }
}

/// Direction of a key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Pressed,
    Released,
}

/// A raw key event as delivered by the OS listener, before normalization.
///
/// Kernel auto-repeat shows up as additional `Pressed` events for a key with
/// no `Released` in between; the normalizer is the sole gate for those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub key: KeyId,
    pub kind: KeyEventKind,
}

impl RawKeyEvent {
    pub fn pressed(key: impl Into<String>) -> Self {
        RawKeyEvent {
            key: KeyId::new(key),
            kind: KeyEventKind::Pressed,
        }
    }

    pub fn released(key: impl Into<String>) -> Self {
        RawKeyEvent {
            key: KeyId::new(key),
            kind: KeyEventKind::Released,
        }
    }
}

/// Which sample slot of a sound pack a key maps to.
///
/// Space and delete get their own dedicated samples; everything else shares
/// the pool of generic key samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Space,
    Delete,
    Generic,
}

impl KeyRole {
    /// Classify a key by identity.
    pub fn of(key: &KeyId) -> Self {
        match key.as_str() {
            "space" => KeyRole::Space,
            "delete" => KeyRole::Delete,
            _ => KeyRole::Generic,
        }
    }
}
