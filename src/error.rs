//! Error types for keyclack
//!
//! Uses thiserror for ergonomic error definitions with clear messages
//! that guide users toward fixing common issues.

use thiserror::Error;

/// Top-level error type for the keyclack application
#[derive(Error, Debug)]
pub enum KeyclackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Listener error: {0}")]
    Listener(#[from] ListenerError),

    #[error("Sound pack error: {0}")]
    Pack(#[from] PackError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to key event listening
#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("Cannot open input device '{0}'. Is the user in the 'input' group?\n  Run: sudo usermod -aG input $USER\n  Then log out and back in.")]
    DeviceAccess(String),

    #[error("No keyboard device found in /dev/input/")]
    NoKeyboard,

    #[error("Key listening is not supported on this platform: {0}")]
    NotSupported(String),

    #[error("evdev error: {0}")]
    Evdev(String),
}

/// Errors related to sound pack discovery and management
#[derive(Error, Debug)]
pub enum PackError {
    #[error("A sound pack named '{0}' already exists")]
    AlreadyExists(String),

    #[error("Not a sound pack directory: {0}")]
    InvalidSource(String),

    #[error("Filesystem error: {0}")]
    Filesystem(String),
}

/// Errors related to audio playback
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Failed to open audio output: {0}")]
    Output(String),

    #[error("Failed to decode sample: {0}")]
    Decode(String),

    #[error("Failed to read sample '{0}': {1}")]
    Sample(String, String),
}

/// Result type alias using KeyclackError
pub type Result<T> = std::result::Result<T, KeyclackError>;

#[cfg(target_os = "linux")]
impl From<evdev::Error> for ListenerError {
    fn from(e: evdev::Error) -> Self {
        ListenerError::Evdev(e.to_string())
    }
}
