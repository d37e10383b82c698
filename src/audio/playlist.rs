use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::entry::Entry;

/// The playlist engine: an ordered sequence of entries, a cursor over it,
/// and a log of every navigation attempt.
///
/// Ordering is insertion order and nothing else - `add` always appends.
/// `current` indexes into `entries`; it is None exactly while the list is
/// empty. The first successful `add` sets the cursor and every later
/// mutation keeps it pointing at a live entry.
#[derive(Debug, Default)]
pub struct Playlist {
    entries: Vec<Entry>,
    current: Option<usize>,
    history: Vec<String>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the end of the playlist.
    ///
    /// The location must exist on disk right now - that is the only
    /// validation performed, and the only time it is performed (the file
    /// can still disappear before playback). Duplicate titles and
    /// duplicate locations are allowed. Returns `false` without touching
    /// anything when the file is missing.
    pub fn add(&mut self, title: impl Into<String>, location: impl Into<PathBuf>) -> bool {
        let title = title.into();
        let location = location.into();

        if !location.exists() {
            warn!("refusing to add '{}': {} does not exist", title, location.display());
            return false;
        }

        info!("added '{}' ({})", title, location.display());
        self.entries.push(Entry::new(title, location));
        if self.current.is_none() {
            // First entry becomes the cursor position
            self.current = Some(0);
        }
        true
    }

    /// Remove the first entry whose title matches exactly.
    ///
    /// If the removed entry was current, the cursor jumps back to the new
    /// head (or clears when the playlist is now empty) - it never moves to
    /// the removed entry's neighbor. Removing an entry ahead of the cursor
    /// leaves the cursor on the same entry it was on. History is untouched.
    pub fn remove(&mut self, title: &str) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.title() == title) else {
            warn!("remove: no entry titled '{}'", title);
            return false;
        };

        self.entries.remove(index);
        info!("removed '{}' (position {})", title, index);

        match self.current {
            Some(cur) if cur == index => {
                self.current = if self.entries.is_empty() { None } else { Some(0) };
            }
            Some(cur) if cur > index => {
                self.current = Some(cur - 1);
            }
            _ => {}
        }
        true
    }

    /// Move the cursor to the next entry and return its location.
    ///
    /// The current title is logged to history *before* checking whether a
    /// next entry exists, so a failed attempt at the tail still leaves a
    /// trace. Returns None (cursor unchanged) when there is no current
    /// entry or no successor.
    pub fn advance_forward(&mut self) -> Option<&Path> {
        let cur = self.current?;
        self.history.push(self.entries[cur].title().to_string());

        if cur + 1 < self.entries.len() {
            self.current = Some(cur + 1);
            Some(self.entries[cur + 1].location())
        } else {
            None
        }
    }

    /// Move the cursor to the previous entry and return its location.
    ///
    /// Same attempt-then-check shape as [`advance_forward`]: the history
    /// append happens even when the cursor is already at the head.
    ///
    /// [`advance_forward`]: Playlist::advance_forward
    pub fn advance_backward(&mut self) -> Option<&Path> {
        let cur = self.current?;
        self.history.push(self.entries[cur].title().to_string());

        if cur > 0 {
            self.current = Some(cur - 1);
            Some(self.entries[cur - 1].location())
        } else {
            None
        }
    }

    /// Snapshot of all titles in playlist order.
    pub fn titles(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.title().to_string()).collect()
    }

    /// Every title that was current when a navigation was attempted,
    /// oldest first. Grows without bound, duplicates expected.
    pub fn history_log(&self) -> &[String] {
        &self.history
    }

    pub fn current_title(&self) -> Option<&str> {
        self.current.map(|i| self.entries[i].title())
    }

    pub fn current_location(&self) -> Option<&Path> {
        self.current.map(|i| self.entries[i].location())
    }

    /// Index of the current entry, for list highlighting.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"riff").unwrap();
        path
    }

    #[test]
    fn test_add_preserves_call_order() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();

        for name in ["one", "two", "three"] {
            let path = touch(&dir, &format!("{name}.mp3"));
            assert!(playlist.add(name, path));
        }

        assert_eq!(playlist.titles(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_add_missing_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();

        assert!(!playlist.add("ghost", dir.path().join("nope.mp3")));
        assert!(playlist.titles().is_empty());
        assert_eq!(playlist.current_title(), None);
    }

    #[test]
    fn test_first_add_sets_current() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();

        playlist.add("a", touch(&dir, "a.mp3"));
        assert_eq!(playlist.current_title(), Some("a"));

        // Later adds never move the cursor
        playlist.add("b", touch(&dir, "b.mp3"));
        assert_eq!(playlist.current_title(), Some("a"));
    }

    #[test]
    fn test_remove_first_match_only() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();
        let path = touch(&dir, "dup.mp3");

        playlist.add("dup", path.clone());
        playlist.add("other", touch(&dir, "other.mp3"));
        playlist.add("dup", path.clone());

        assert!(playlist.remove("dup"));
        assert_eq!(playlist.titles(), vec!["other", "dup"]);

        // Re-adding the same title afterwards is independent
        assert!(playlist.add("dup", path));
        assert_eq!(playlist.titles(), vec!["other", "dup", "dup"]);
    }

    #[test]
    fn test_remove_no_match_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();

        assert!(!playlist.remove("anything"));

        playlist.add("a", touch(&dir, "a.mp3"));
        assert!(!playlist.remove("b"));
        assert_eq!(playlist.titles(), vec!["a"]);
        assert_eq!(playlist.current_title(), Some("a"));
    }

    #[test]
    fn test_remove_current_resets_to_head() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();

        playlist.add("a", touch(&dir, "a.mp3"));
        playlist.add("b", touch(&dir, "b.mp3"));
        playlist.add("c", touch(&dir, "c.mp3"));
        playlist.advance_forward();
        assert_eq!(playlist.current_title(), Some("b"));

        // Cursor goes back to the head, not to b's neighbor c
        assert!(playlist.remove("b"));
        assert_eq!(playlist.current_title(), Some("a"));
    }

    #[test]
    fn test_remove_last_entry_clears_current() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();

        playlist.add("solo", touch(&dir, "solo.mp3"));
        assert!(playlist.remove("solo"));
        assert!(playlist.is_empty());
        assert_eq!(playlist.current_title(), None);
        assert_eq!(playlist.current_location(), None);
    }

    #[test]
    fn test_remove_before_current_keeps_cursor_on_entry() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();

        playlist.add("a", touch(&dir, "a.mp3"));
        playlist.add("b", touch(&dir, "b.mp3"));
        playlist.add("c", touch(&dir, "c.mp3"));
        playlist.advance_forward();
        playlist.advance_forward();
        assert_eq!(playlist.current_title(), Some("c"));

        assert!(playlist.remove("a"));
        assert_eq!(playlist.current_title(), Some("c"));
        assert_eq!(playlist.current_index(), Some(1));
    }

    #[test]
    fn test_advance_forward_moves_and_returns_location() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();
        let b_path = touch(&dir, "b.mp3");

        playlist.add("a", touch(&dir, "a.mp3"));
        playlist.add("b", b_path.clone());

        let location = playlist.advance_forward().map(Path::to_path_buf);
        assert_eq!(location, Some(b_path));
        assert_eq!(playlist.current_title(), Some("b"));
        assert_eq!(playlist.history_log(), ["a"]);
    }

    #[test]
    fn test_advance_forward_at_tail_still_logs() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();

        playlist.add("only", touch(&dir, "only.mp3"));

        assert!(playlist.advance_forward().is_none());
        assert_eq!(playlist.current_title(), Some("only"));
        assert_eq!(playlist.history_log(), ["only"]);
    }

    #[test]
    fn test_advance_backward_at_head_still_logs() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();

        playlist.add("a", touch(&dir, "a.mp3"));
        playlist.add("b", touch(&dir, "b.mp3"));

        assert!(playlist.advance_backward().is_none());
        assert_eq!(playlist.current_title(), Some("a"));
        assert_eq!(playlist.history_log(), ["a"]);
    }

    #[test]
    fn test_advance_backward_moves_back() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();
        let a_path = touch(&dir, "a.mp3");

        playlist.add("a", a_path.clone());
        playlist.add("b", touch(&dir, "b.mp3"));
        playlist.advance_forward();

        let location = playlist.advance_backward().map(Path::to_path_buf);
        assert_eq!(location, Some(a_path));
        assert_eq!(playlist.current_title(), Some("a"));
        assert_eq!(playlist.history_log(), ["a", "b"]);
    }

    #[test]
    fn test_history_counts_every_attempt() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();

        // No current entry: navigation logs nothing
        playlist.advance_forward();
        playlist.advance_backward();
        assert!(playlist.history_log().is_empty());

        playlist.add("a", touch(&dir, "a.mp3"));
        playlist.add("b", touch(&dir, "b.mp3"));

        playlist.advance_forward(); // a -> b
        playlist.advance_forward(); // stuck at b
        playlist.advance_backward(); // b -> a
        playlist.advance_backward(); // stuck at a
        assert_eq!(playlist.history_log(), ["a", "b", "b", "a"]);
    }

    #[test]
    fn test_remove_does_not_touch_history() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();

        playlist.add("a", touch(&dir, "a.mp3"));
        playlist.advance_forward();
        assert_eq!(playlist.history_log().len(), 1);

        playlist.remove("a");
        assert_eq!(playlist.history_log(), ["a"]);
    }

    #[test]
    fn test_full_session_scenario() {
        let dir = TempDir::new().unwrap();
        let mut playlist = Playlist::new();
        let c_path = touch(&dir, "c.mp3");

        assert!(playlist.add("A", touch(&dir, "a.mp3")));
        assert_eq!(playlist.current_title(), Some("A"));

        assert!(!playlist.add("B", dir.path().join("b.mp3")));
        assert_eq!(playlist.titles(), vec!["A"]);

        assert!(playlist.add("C", c_path.clone()));

        let location = playlist.advance_forward().map(Path::to_path_buf);
        assert_eq!(location, Some(c_path));
        assert_eq!(playlist.current_title(), Some("C"));
        assert_eq!(playlist.history_log(), ["A"]);

        assert!(playlist.advance_forward().is_none());
        assert_eq!(playlist.current_title(), Some("C"));
        assert_eq!(playlist.history_log(), ["A", "C"]);

        assert!(playlist.remove("A"));
        assert_eq!(playlist.titles(), vec!["C"]);
        assert_eq!(playlist.current_title(), Some("C"));
    }
}
