use super::AudioConfig;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// Everything that can go wrong between "here is a path" and audible sound.
/// The UI turns any of these into a status-line message; playlist state is
/// never affected.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("no audio output device available: {0}")]
    Device(String),
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot play {path}: unsupported or corrupt file")]
    Decode { path: String },
}

/// Thin wrapper around a rodio output stream that guarantees at most one
/// active sink. Every `play` stops whatever was playing before it loads
/// the new file, so stop -> load -> play sequencing is enforced here and
/// not left to callers.
pub struct AudioPlayer {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sink: Option<Sink>,
    state: PlaybackState,
    volume: f32,
}

impl AudioPlayer {
    pub fn new(config: AudioConfig) -> Result<Self, PlayerError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| PlayerError::Device(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
            state: PlaybackState::Stopped,
            volume: config.volume.clamp(0.0, 1.0),
        })
    }

    /// Stop current playback (if any), then load and start the file at
    /// `location`. On any failure the player ends up stopped and the
    /// error is returned for the caller to surface.
    pub fn play(&mut self, location: &Path) -> Result<(), PlayerError> {
        self.stop();

        let source = Self::decode(location)?;

        let sink =
            Sink::try_new(&self.stream_handle).map_err(|e| PlayerError::Device(e.to_string()))?;
        sink.set_volume(self.volume);
        sink.append(source);

        info!("playing {}", location.display());
        self.sink = Some(sink);
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Open and decode a file without touching the output device. An
    /// unreadable path and an undecodable file are distinct failures so
    /// the UI can report them apart.
    fn decode(location: &Path) -> Result<Decoder<BufReader<File>>, PlayerError> {
        let file = File::open(location).map_err(|source| PlayerError::Open {
            path: location.display().to_string(),
            source,
        })?;

        Decoder::new(BufReader::new(file)).map_err(|_| PlayerError::Decode {
            path: location.display().to_string(),
        })
    }

    /// Tear down the active sink. Safe to call when nothing is playing.
    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            debug!("stopping playback");
            sink.stop();
        }
        self.state = PlaybackState::Stopped;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn state(&self) -> PlaybackState {
        // A sink that drained on its own counts as stopped
        if self.state == PlaybackState::Playing
            && self.sink.as_ref().map_or(true, |s| s.empty())
        {
            return PlaybackState::Stopped;
        }
        self.state.clone()
    }
}

impl std::fmt::Debug for AudioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioPlayer")
            .field("state", &self.state)
            .field("volume", &self.volume)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_an_open_error() {
        let dir = TempDir::new().unwrap();

        let err = AudioPlayer::decode(&dir.path().join("gone.mp3")).err().unwrap();
        assert!(matches!(err, PlayerError::Open { .. }));
    }

    #[test]
    fn test_non_audio_file_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("liner-notes.txt");
        fs::write(&path, b"definitely not audio").unwrap();

        let err = AudioPlayer::decode(&path).err().unwrap();
        assert!(matches!(err, PlayerError::Decode { .. }));
    }
}
