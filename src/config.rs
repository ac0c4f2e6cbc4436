//! Settings record and on-disk persistence for keyclack
//!
//! The settings file is a flat record (~/.config/keyclack/config.toml).
//! Loading falls back to defaults on any failure so a broken file never
//! prevents startup; saving reports errors but callers do not abort on them.

use crate::error::KeyclackError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file content
pub const DEFAULT_CONFIG: &str = r#"# Keyclack Configuration
#
# Location: ~/.config/keyclack/config.toml
# The daemon rewrites this file on shutdown, preserving these fields.

# Master switch. When false, key events are still tracked but no sound plays.
enabled = true

# Master volume, 0.0 to 1.0. Values outside the range are clamped.
volume = 0.7

# Suppress the sound for a key that is already held down.
# With this off, kernel auto-repeat retriggers the sample on every repeat.
prevent_repeats = true

# Active sound pack, by directory name under the packs directory.
# "default" always exists; add more with `keyclack packs add <dir>`.
theme = "default"

# UI preferences, persisted for front ends. The daemon ignores them.
dark_mode = false
language = "en"

# Override the sound pack directory.
# Default: ~/.local/share/keyclack/sound_packs
# packs_dir = "/path/to/sound_packs"
"#;

/// UI language, persisted for front ends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

/// The persisted settings record.
///
/// This is also the live settings record: the daemon wraps one instance in
/// [`crate::settings::SharedSettings`] and saves it back on shutdown.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    /// Master switch for playback
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Master volume (0.0 to 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Suppress repeated presses of a held key
    #[serde(default = "default_true")]
    pub prevent_repeats: bool,

    /// Name of the active sound pack
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Dark mode preference (UI glue, unused by the daemon)
    #[serde(default)]
    pub dark_mode: bool,

    /// UI language (UI glue, unused by the daemon)
    #[serde(default)]
    pub language: Language,

    /// Override for the sound pack directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packs_dir: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_volume() -> f32 {
    0.7
}

fn default_theme() -> String {
    "default".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: default_volume(),
            prevent_repeats: true,
            theme: default_theme(),
            dark_mode: false,
            language: Language::default(),
            packs_dir: None,
        }
    }
}

impl Settings {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "keyclack")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path (holds the sound packs)
    pub fn data_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "keyclack")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolve the sound pack directory, honoring the `packs_dir` override
    pub fn packs_dir(&self) -> PathBuf {
        self.packs_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::data_dir().join("sound_packs"))
    }
}

/// Load settings from file, falling back to defaults on any failure.
///
/// Missing file, unreadable file, and malformed TOML all yield defaults;
/// the failure is logged, never surfaced as an error.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let config_path = path.map(PathBuf::from).or_else(Settings::default_path);

    let Some(path) = config_path else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Settings::default();
    };

    if !path.exists() {
        tracing::debug!("Settings file not found at {:?}, using defaults", path);
        return Settings::default();
    }

    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read settings from {:?}: {}, using defaults", path, e);
            return Settings::default();
        }
    };

    match toml::from_str(&contents) {
        Ok(settings) => {
            tracing::debug!("Loaded settings from {:?}", path);
            settings
        }
        Err(e) => {
            tracing::warn!("Invalid settings file {:?}: {}, using defaults", path, e);
            Settings::default()
        }
    }
}

/// Save settings to file
pub fn save_settings(settings: &Settings, path: &Path) -> Result<(), KeyclackError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| KeyclackError::Config(format!("Failed to create config dir: {}", e)))?;
    }

    let contents = toml::to_string_pretty(settings)
        .map_err(|e| KeyclackError::Config(format!("Failed to serialize settings: {}", e)))?;

    std::fs::write(path, contents)
        .map_err(|e| KeyclackError::Config(format!("Failed to write settings: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.enabled);
        assert_eq!(settings.volume, 0.7);
        assert!(settings.prevent_repeats);
        assert_eq!(settings.theme, "default");
        assert!(!settings.dark_mode);
        assert_eq!(settings.language, Language::En);
    }

    #[test]
    fn test_parse_settings_toml() {
        let toml_str = r#"
            enabled = false
            volume = 0.4
            prevent_repeats = false
            theme = "CherryMX Black - ABS keycaps"
            dark_mode = true
            language = "ru"
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert!(!settings.enabled);
        assert_eq!(settings.volume, 0.4);
        assert!(!settings.prevent_repeats);
        assert_eq!(settings.theme, "CherryMX Black - ABS keycaps");
        assert!(settings.dark_mode);
        assert_eq!(settings.language, Language::Ru);
        assert!(settings.packs_dir.is_none());
    }

    #[test]
    fn test_parse_partial_settings() {
        // Every field is optional; missing fields take defaults
        let settings: Settings = toml::from_str("volume = 1.0").unwrap();
        assert_eq!(settings.volume, 1.0);
        assert!(settings.enabled);
        assert_eq!(settings.theme, "default");
    }

    #[test]
    fn test_default_config_template_parses() {
        let settings: Settings = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_malformed_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "volume = \"loud\"").unwrap();

        let settings = load_settings(Some(&path));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.volume = 0.25;
        settings.theme = "clicky".to_string();
        settings.language = Language::Ru;

        save_settings(&settings, &path).unwrap();
        let reloaded = load_settings(Some(&path));
        assert_eq!(reloaded, settings);
    }
}
