//! System-wide key event listening
//!
//! On Linux, key events are read at the kernel level via evdev, which works
//! on all Wayland compositors and in the console because it bypasses the
//! display server. Requires the user to be in the 'input' group.
//!
//! Unlike a hotkey listener, every key event is forwarded: the normalizer
//! downstream decides what becomes sound.

#[cfg(target_os = "linux")]
pub mod evdev_listener;

use crate::error::ListenerError;
use crate::keys::RawKeyEvent;
use tokio::sync::mpsc;

/// Trait for key event source implementations
#[async_trait::async_trait]
pub trait KeyEventSource: Send {
    /// Start listening for key events.
    /// Returns a channel receiver for the raw event stream.
    async fn start(&mut self) -> Result<mpsc::Receiver<RawKeyEvent>, ListenerError>;

    /// Stop listening and clean up.
    async fn stop(&mut self) -> Result<(), ListenerError>;
}

/// Factory function to create the platform key event source.
#[cfg(target_os = "linux")]
pub fn create_listener() -> Result<Box<dyn KeyEventSource>, ListenerError> {
    Ok(Box::new(evdev_listener::EvdevListener::new()?))
}

/// Factory function to create the platform key event source.
///
/// Only Linux (evdev) is supported.
#[cfg(not(target_os = "linux"))]
pub fn create_listener() -> Result<Box<dyn KeyEventSource>, ListenerError> {
    Err(ListenerError::NotSupported(
        "keyclack reads key events via evdev and currently runs on Linux only".to_string(),
    ))
}
