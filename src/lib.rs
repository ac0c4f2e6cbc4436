//! Keyclack: mechanical keyboard sound simulator for Linux
//!
//! This library provides the core functionality for:
//! - Listening for key press/release events system-wide via evdev
//! - Normalizing the raw stream (per-key de-duplication, auto-repeat gating)
//! - Selecting samples from installed sound packs (fixed roles for space and
//!   delete, random choice among generic key samples)
//! - Polyphonic playback through a bounded voice pool via rodio
//! - Live-mutable settings shared between the event and control contexts
//!
//! # Architecture
//!
//! ```text
//!   OS key events (evdev)
//!          │
//!          ▼
//!   ┌──────────────┐   press/release    ┌──────────────┐
//!   │   Listener   │ ─────────────────▶ │  Normalizer  │ held-key set,
//!   └──────────────┘                    └──────────────┘ repeat suppression
//!                                              │ Trigger(key)
//!                                              ▼
//!   ┌──────────────┐   theme lookup     ┌──────────────┐
//!   │   SoundPack  │ ◀───────────────── │   Playback   │ voice pool (32),
//!   │   Registry   │   sample path ───▶ │    Engine    │ oldest reclaimed
//!   └──────────────┘                    └──────────────┘
//!          ▲                                   ▲
//!          │ add pack                          │ volume, enabled, theme
//!   ┌─────────────────────────────────────────────────┐
//!   │          Settings (shared, live-mutable)        │
//!   └─────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod config;
pub mod daemon;
pub mod error;
pub mod keys;
pub mod listener;
pub mod normalizer;
pub mod playback;
pub mod settings;
pub mod soundpack;

pub use app::App;
pub use config::Settings;
pub use daemon::Daemon;
pub use error::{KeyclackError, Result};
pub use keys::{KeyEventKind, KeyId, KeyRole, RawKeyEvent};
pub use settings::SharedSettings;
pub use soundpack::{SoundPack, SoundPackRegistry};
