// mixtape - terminal playlist manager
// The playlist engine lives in audio::playlist; everything else is a
// thin shell (terminal UI, rodio playback, config) around it

pub mod audio;  // playlist core, entry type, playback driver
pub mod config; // settings with sensible defaults
pub mod ui;     // terminal interface

// Export the stuff other modules actually use
pub use audio::{AudioPlayer, Entry, PlaybackState, PlayerError, Playlist};
pub use config::Config;
