//! Daemon module - main event loop orchestration
//!
//! Wires the key listener to the playback pipeline, handles shutdown
//! signals, and persists settings on exit. Playback-path errors never stop
//! the loop; they are downgraded inside [`crate::app::App`].

use crate::app::App;
use crate::config::{self, Settings};
use crate::error::{KeyclackError, Result};
use crate::listener::{self, KeyEventSource};
use crate::playback::{self, RodioBackend};
use crate::settings::SharedSettings;
use crate::soundpack::SoundPackRegistry;
use std::path::PathBuf;
use tokio::signal::unix::{signal, SignalKind};

/// Main daemon that owns the pipeline for the lifetime of the process.
pub struct Daemon {
    app: App<RodioBackend>,
    settings_path: Option<PathBuf>,
}

impl Daemon {
    /// Build the pipeline: discover packs, open the audio output.
    ///
    /// `settings_path` is where settings are persisted on shutdown; `None`
    /// skips persistence.
    pub fn new(initial: Settings, settings_path: Option<PathBuf>) -> Result<Self> {
        let packs_dir = initial.packs_dir();
        let registry = SoundPackRegistry::discover(&packs_dir)?;

        let settings = SharedSettings::new(initial);
        let snapshot = settings.snapshot();

        if registry.get(&snapshot.theme).is_none() {
            tracing::warn!(
                "Selected theme '{}' is not installed; keys will be silent until it is added",
                snapshot.theme
            );
        }

        let engine = playback::rodio_engine()?;
        tracing::info!(
            "Audio output ready ({} voices, volume {:.0}%)",
            crate::playback::DEFAULT_VOICES,
            snapshot.volume * 100.0
        );

        Ok(Self {
            app: App::new(settings, registry, engine),
            settings_path,
        })
    }

    /// Access the application facade (settings, packs, status).
    pub fn app(&self) -> &App<RodioBackend> {
        &self.app
    }

    /// Run the daemon main loop until SIGINT/SIGTERM.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("Starting keyclack daemon");

        let mut sigterm = signal(SignalKind::terminate()).map_err(|e| {
            KeyclackError::Config(format!("Failed to set up SIGTERM handler: {}", e))
        })?;
        let mut sigint = signal(SignalKind::interrupt()).map_err(|e| {
            KeyclackError::Config(format!("Failed to set up SIGINT handler: {}", e))
        })?;

        let snapshot = self.app.settings().snapshot();
        tracing::info!(
            "Theme: {} | enabled: {} | prevent repeats: {}",
            snapshot.theme,
            snapshot.enabled,
            snapshot.prevent_repeats
        );

        let mut key_listener = listener::create_listener()?;
        let mut key_rx = key_listener.start().await?;

        // Main event loop
        loop {
            tokio::select! {
                maybe_event = key_rx.recv() => {
                    match maybe_event {
                        Some(event) => self.app.handle_event(&event),
                        None => {
                            tracing::warn!("Key listener channel closed");
                            break;
                        }
                    }
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, shutting down");
                    break;
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, shutting down");
                    break;
                }
            }
        }

        // Pending playback may finish or be dropped; no drain is required
        key_listener.stop().await?;
        self.app.reset_keys();
        self.save_settings();

        tracing::info!("Daemon stopped");
        Ok(())
    }

    /// Persist the live settings; failures are reported, not fatal.
    fn save_settings(&self) {
        let Some(ref path) = self.settings_path else {
            return;
        };
        let snapshot = self.app.settings().snapshot();
        if let Err(e) = config::save_settings(&snapshot, path) {
            tracing::warn!("Failed to save settings to {:?}: {}", path, e);
        } else {
            tracing::debug!("Settings saved to {:?}", path);
        }
    }
}
