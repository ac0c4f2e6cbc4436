//! rodio output backend
//!
//! The [`AudioBackend`] trait is the seam between the engine's voice
//! bookkeeping and the actual audio output; tests substitute a recording
//! backend. The production backend decodes a sample file into a rodio sink
//! per voice, with the master volume applied at start.

use super::pool::Voice;
use crate::error::PlaybackError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::path::Path;

/// Starts playback of sample files, one voice per request.
pub trait AudioBackend {
    type Voice: Voice;

    /// Begin playback of `sample` at `volume`, returning the in-flight
    /// voice. Must not block on playback completion.
    fn start(&self, sample: &Path, volume: f32) -> Result<Self::Voice, PlaybackError>;
}

/// rodio-backed audio output.
pub struct RodioBackend {
    // Keeps the output device alive; dropping it silences all sinks.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioBackend {
    /// Open the default audio output device.
    pub fn new() -> Result<Self, PlaybackError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| PlaybackError::Output(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

impl AudioBackend for RodioBackend {
    type Voice = RodioVoice;

    fn start(&self, sample: &Path, volume: f32) -> Result<RodioVoice, PlaybackError> {
        let data = std::fs::read(sample)
            .map_err(|e| PlaybackError::Sample(sample.display().to_string(), e.to_string()))?;

        let source = Decoder::new(Cursor::new(data))
            .map_err(|e| PlaybackError::Decode(e.to_string()))?;

        let sink =
            Sink::try_new(&self.handle).map_err(|e| PlaybackError::Output(e.to_string()))?;
        sink.append(source.amplify(volume));

        Ok(RodioVoice { sink })
    }
}

/// A playing rodio sink. Dropping it (on reap) also stops playback.
pub struct RodioVoice {
    sink: Sink,
}

impl Voice for RodioVoice {
    fn is_done(&self) -> bool {
        self.sink.empty()
    }

    fn stop(&self) {
        self.sink.stop();
    }
}
