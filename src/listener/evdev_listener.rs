//! evdev-based key event listener
//!
//! Opens every keyboard device under /dev/input in non-blocking mode and
//! forwards each key event into the pipeline. Kernel auto-repeat (event
//! value 2) is surfaced as another press so the normalizer stays the single
//! place that decides about repeats.

use super::KeyEventSource;
use crate::error::ListenerError;
use crate::keys::{KeyEventKind, KeyId, RawKeyEvent};
use evdev::{Device, InputEventKind, Key};
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};

/// evdev-based key event source
pub struct EvdevListener {
    /// Paths to keyboard devices
    device_paths: Vec<PathBuf>,
    /// Signal to stop the listener task
    stop_signal: Option<oneshot::Sender<()>>,
}

impl EvdevListener {
    /// Create a listener over all detected keyboard devices
    pub fn new() -> Result<Self, ListenerError> {
        let device_paths = find_keyboard_devices()?;

        if device_paths.is_empty() {
            return Err(ListenerError::NoKeyboard);
        }

        tracing::debug!(
            "Found {} keyboard device(s): {:?}",
            device_paths.len(),
            device_paths
        );

        Ok(Self {
            device_paths,
            stop_signal: None,
        })
    }
}

#[async_trait::async_trait]
impl KeyEventSource for EvdevListener {
    async fn start(&mut self) -> Result<mpsc::Receiver<RawKeyEvent>, ListenerError> {
        // Typing bursts outrun playback; the channel absorbs them
        let (tx, rx) = mpsc::channel(256);
        let (stop_tx, stop_rx) = oneshot::channel();
        self.stop_signal = Some(stop_tx);

        let device_paths = self.device_paths.clone();

        // Spawn the listener task
        tokio::task::spawn_blocking(move || {
            evdev_listener_loop(device_paths, tx, stop_rx);
        });

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), ListenerError> {
        if let Some(stop) = self.stop_signal.take() {
            let _ = stop.send(());
        }
        Ok(())
    }
}

/// Main listener loop running in a blocking task
fn evdev_listener_loop(
    device_paths: Vec<PathBuf>,
    tx: mpsc::Sender<RawKeyEvent>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    // Open all keyboard devices in non-blocking mode
    let mut devices: Vec<Device> = device_paths
        .iter()
        .filter_map(|path| match Device::open(path) {
            Ok(device) => {
                // Set device to non-blocking mode so fetch_events doesn't block
                let fd = device.as_raw_fd();
                unsafe {
                    let flags = libc::fcntl(fd, libc::F_GETFL);
                    if flags != -1 {
                        libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK);
                    }
                }
                tracing::debug!("Opened device (non-blocking): {:?}", path);
                Some(device)
            }
            Err(e) => {
                tracing::warn!("Failed to open {:?}: {}", path, e);
                None
            }
        })
        .collect();

    if devices.is_empty() {
        tracing::error!("No keyboard devices could be opened");
        return;
    }

    tracing::info!("Listening on {} keyboard device(s)", devices.len());

    loop {
        // Check for stop signal (non-blocking)
        match stop_rx.try_recv() {
            Ok(_) | Err(oneshot::error::TryRecvError::Closed) => {
                tracing::debug!("Key listener stopping");
                return;
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
        }

        // Poll each device (all set to non-blocking mode)
        for device in &mut devices {
            // fetch_events returns immediately if no events (non-blocking)
            if let Ok(events) = device.fetch_events() {
                for event in events {
                    if let InputEventKind::Key(key) = event.kind() {
                        // 1 = press, 2 = kernel auto-repeat, 0 = release
                        let kind = match event.value() {
                            1 | 2 => KeyEventKind::Pressed,
                            0 => KeyEventKind::Released,
                            _ => continue,
                        };
                        let raw = RawKeyEvent {
                            key: key_name(key),
                            kind,
                        };
                        if tx.blocking_send(raw).is_err() {
                            return; // Channel closed
                        }
                    }
                }
            }
        }

        // Small sleep to avoid busy-waiting
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
}

/// Find all keyboard input devices
fn find_keyboard_devices() -> Result<Vec<PathBuf>, ListenerError> {
    let mut keyboards = Vec::new();

    let input_dir = std::fs::read_dir("/dev/input")
        .map_err(|e| ListenerError::DeviceAccess(format!("/dev/input: {}", e)))?;

    for entry in input_dir {
        let entry = entry.map_err(|e| ListenerError::DeviceAccess(e.to_string()))?;
        let path = entry.path();

        // Only look at event* devices
        let is_event_device = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with("event"))
            .unwrap_or(false);

        if !is_event_device {
            continue;
        }

        // Try to open and check if it's a keyboard
        match Device::open(&path) {
            Ok(device) => {
                // Check if device has keyboard capabilities
                let has_keys = device
                    .supported_keys()
                    .map(|keys| {
                        // A keyboard should have at least some letter keys
                        keys.contains(Key::KEY_A)
                            && keys.contains(Key::KEY_Z)
                            && keys.contains(Key::KEY_ENTER)
                    })
                    .unwrap_or(false);

                if has_keys {
                    tracing::debug!(
                        "Found keyboard: {:?} ({:?})",
                        path,
                        device.name().unwrap_or("unknown")
                    );
                    keyboards.push(path);
                }
            }
            Err(e) => {
                // Permission denied is common for non-input-group users
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    return Err(ListenerError::DeviceAccess(path.display().to_string()));
                }
                // Other errors (device busy, etc.) - just skip
                tracing::trace!("Skipping {:?}: {}", path, e);
            }
        }
    }

    Ok(keyboards)
}

/// Map an evdev key to the pipeline's platform-independent name.
///
/// evdev debug names look like `KEY_SPACE`; the prefix is dropped and the
/// rest lowercased, so `KEY_SPACE` becomes "space" and `KEY_A` becomes "a".
/// Codes without a named constant fall back to "key<code>".
fn key_name(key: Key) -> KeyId {
    let debug = format!("{:?}", key);
    let name = debug
        .strip_prefix("KEY_")
        .or_else(|| debug.strip_prefix("BTN_"));

    match name {
        Some(rest) => KeyId::new(rest.to_ascii_lowercase()),
        None => KeyId::new(format!("key{}", key.code())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_name_mapping() {
        assert_eq!(key_name(Key::KEY_SPACE), KeyId::new("space"));
        assert_eq!(key_name(Key::KEY_DELETE), KeyId::new("delete"));
        assert_eq!(key_name(Key::KEY_A), KeyId::new("a"));
        assert_eq!(key_name(Key::KEY_LEFTSHIFT), KeyId::new("leftshift"));
        assert_eq!(key_name(Key::KEY_BACKSPACE), KeyId::new("backspace"));
    }

    #[test]
    fn test_unknown_key_code_falls_back() {
        let key = Key::new(0x2ff);
        let name = key_name(key);
        // Whatever the debug formatting, the name is non-empty and stable
        assert!(!name.as_str().is_empty());
        assert_eq!(name, key_name(Key::new(0x2ff)));
    }
}
