//! Application facade tying the pipeline together
//!
//! [`App`] owns the normalizer, the sound pack registry, the playback
//! engine, and a handle to the shared settings. The event context feeds raw
//! key events through [`App::handle_event`]; the control context mutates
//! settings and packs through the narrow methods below. Changes take effect
//! on the very next event.
//!
//! Playback-path failures never propagate out of event handling; they are
//! logged and reflected in the status message.

use crate::error::PackError;
use crate::keys::{KeyId, KeyRole, RawKeyEvent};
use crate::normalizer::{Normalized, Normalizer};
use crate::playback::{AudioBackend, PlaybackEngine};
use crate::settings::SharedSettings;
use crate::soundpack::SoundPackRegistry;
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};

pub struct App<B: AudioBackend> {
    settings: SharedSettings,
    registry: RwLock<SoundPackRegistry>,
    normalizer: Mutex<Normalizer>,
    engine: PlaybackEngine<B>,
    status: Mutex<String>,
}

impl<B: AudioBackend> App<B> {
    pub fn new(
        settings: SharedSettings,
        registry: SoundPackRegistry,
        engine: PlaybackEngine<B>,
    ) -> Self {
        Self {
            settings,
            registry: RwLock::new(registry),
            normalizer: Mutex::new(Normalizer::new()),
            engine,
            status: Mutex::new("Ready".to_string()),
        }
    }

    /// Handle to the live settings (shared with the control context).
    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// Feed one raw key event through normalization and playback.
    pub fn handle_event(&self, event: &RawKeyEvent) {
        let snapshot = self.settings.snapshot();
        let outcome = self.normalizer.lock().normalize(event, &snapshot);
        if let Normalized::Trigger(key) = outcome {
            self.play_key(&key, &snapshot);
        }
    }

    fn play_key(&self, key: &KeyId, snapshot: &crate::config::Settings) {
        // Resolve under the registry lock, play outside it
        let sample: Option<PathBuf> = {
            let registry = self.registry.read();
            let Some(pack) = registry.get(&snapshot.theme) else {
                tracing::warn!("Selected theme '{}' is not installed", snapshot.theme);
                self.set_status(format!("Theme '{}' not found", snapshot.theme));
                return;
            };
            pack.resolve(KeyRole::of(key)).map(Path::to_path_buf)
        };

        // No sample for this role in the active pack: a normal, silent case
        let Some(sample) = sample else {
            return;
        };

        if let Err(e) = self.engine.play(&sample, snapshot.volume) {
            tracing::warn!("Failed to play {:?} for key '{}': {}", sample, key, e);
            self.set_status("Sound error");
        }
    }

    // --- control-context API ---

    pub fn set_enabled(&self, enabled: bool) {
        self.settings.set_enabled(enabled);
        self.set_status(if enabled { "Sounds enabled" } else { "Sounds disabled" });
    }

    pub fn set_prevent_repeats(&self, prevent: bool) {
        self.settings.set_prevent_repeats(prevent);
    }

    pub fn set_volume(&self, volume: f32) {
        self.settings.set_volume(volume);
    }

    /// Select the active theme. A name that is not installed is accepted;
    /// playback no-ops until it appears, and the status surfaces the miss.
    pub fn set_theme(&self, name: &str) {
        self.settings.set_theme(name);
        if self.registry.read().get(name).is_none() {
            self.set_status(format!("Theme '{}' not found", name));
        } else {
            self.set_status(format!("Theme '{}' selected", name));
        }
    }

    /// Import a sound pack from a directory; see
    /// [`SoundPackRegistry::add_pack`].
    pub fn add_pack(&self, source: &Path) -> Result<String, PackError> {
        let mut registry = self.registry.write();
        match registry.add_pack(source) {
            Ok(pack) => {
                let name = pack.name().to_string();
                self.set_status(format!("Theme '{}' added", name));
                Ok(name)
            }
            Err(e) => {
                self.set_status(e.to_string());
                Err(e)
            }
        }
    }

    /// Registered theme names, default first.
    pub fn theme_names(&self) -> Vec<String> {
        self.registry.read().names()
    }

    /// Human-readable outcome of the last operation.
    pub fn status_message(&self) -> String {
        self.status.lock().clone()
    }

    /// Clear the held-key set (listener shutdown).
    pub fn reset_keys(&self) {
        self.normalizer.lock().reset();
    }

    /// Number of keys currently held down.
    pub fn held_keys(&self) -> usize {
        self.normalizer.lock().held_count()
    }

    /// Number of voices currently playing.
    pub fn active_voices(&self) -> usize {
        self.engine.active_voices()
    }

    /// Stop all in-flight playback.
    pub fn stop_all(&self) {
        self.engine.stop_all();
    }

    pub fn engine(&self) -> &PlaybackEngine<B> {
        &self.engine
    }

    fn set_status(&self, message: impl Into<String>) {
        *self.status.lock() = message.into();
    }
}
