pub mod entry;
pub mod player;
pub mod playlist;

pub use entry::Entry;
pub use player::{AudioPlayer, PlaybackState, PlayerError};
pub use playlist::Playlist;

#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub volume: f32, // 0.0 to 1.0
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { volume: 0.7 }
    }
}

impl From<&crate::config::Config> for AudioConfig {
    fn from(config: &crate::config::Config) -> Self {
        // Config files are hand-edited; out-of-range volumes must not
        // reach the player (or the volume gauge, which asserts 0.0..=1.0)
        Self {
            volume: config.audio.volume.clamp(0.0, 1.0),
        }
    }
}
