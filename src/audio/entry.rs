use std::path::{Path, PathBuf};

/// One playable item in the playlist: a user-supplied label plus the
/// file it points at. Entries are only ever created through
/// [`Playlist::add`](super::Playlist::add), which validates the location
/// first; after that the entry is plain immutable data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    title: String,
    location: PathBuf,
}

impl Entry {
    pub(crate) fn new(title: String, location: PathBuf) -> Self {
        Self { title, location }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn location(&self) -> &Path {
        &self.location
    }
}
