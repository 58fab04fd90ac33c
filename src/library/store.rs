use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::debug;

use super::model::Track;

#[derive(Debug, Error)]
pub enum LibraryError {
    /// A song with the same case-insensitive title is already stored.
    #[error("song '{0}' already exists")]
    Duplicate(String),

    #[error("invalid {field} for '{title}': {reason}")]
    InvalidField {
        title: String,
        field: &'static str,
        reason: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of adding a batch of scanned tracks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

/// Normalize a title into the library key.
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase()
}

/// Keyed song store. At most one track per normalized title.
#[derive(Debug, Default, Clone)]
pub struct Library {
    songs: BTreeMap<String, Track>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `track`, rejecting duplicates by normalized title.
    ///
    /// A duplicate leaves the stored record untouched.
    pub fn add(&mut self, mut track: Track) -> Result<(), LibraryError> {
        // An empty artwork field on disk means "none".
        if track.artwork.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            track.artwork = None;
        }
        validate(&track)?;
        let key = track.key();
        if self.songs.contains_key(&key) {
            return Err(LibraryError::Duplicate(track.title));
        }
        debug!(title = %track.title, "added song");
        self.songs.insert(key, track);
        Ok(())
    }

    /// Add every track in `tracks`, counting what was skipped and why.
    pub fn import(&mut self, tracks: impl IntoIterator<Item = Track>) -> ImportReport {
        let mut report = ImportReport::default();
        for track in tracks {
            match self.add(track) {
                Ok(()) => report.added += 1,
                Err(LibraryError::Duplicate(_)) => report.duplicates += 1,
                Err(e) => {
                    debug!("import skipped a track: {e}");
                    report.invalid += 1;
                }
            }
        }
        report
    }

    /// Remove the song with this title (case-insensitive). Returns whether one was removed.
    pub fn delete(&mut self, title: &str) -> bool {
        self.songs.remove(&normalize_title(title)).is_some()
    }

    pub fn get(&self, title: &str) -> Option<&Track> {
        self.songs.get(&normalize_title(title))
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// All songs sorted by artist, then album, then track number.
    pub fn list_all(&self) -> Vec<&Track> {
        let mut songs: Vec<&Track> = self.songs.values().collect();
        songs.sort_by(|a, b| {
            a.artist
                .cmp(&b.artist)
                .then_with(|| a.album.cmp(&b.album))
                .then_with(|| a.track_number.cmp(&b.track_number))
        });
        songs
    }

    /// Songs grouped by album name, each group sorted by track number.
    pub fn group_by_album(&self) -> BTreeMap<String, Vec<&Track>> {
        let mut albums: BTreeMap<String, Vec<&Track>> = BTreeMap::new();
        for song in self.songs.values() {
            albums.entry(song.album.clone()).or_default().push(song);
        }
        for songs in albums.values_mut() {
            songs.sort_by_key(|s| s.track_number);
        }
        albums
    }

    pub fn genres(&self) -> BTreeSet<&str> {
        self.songs.values().map(|s| s.genre.as_str()).collect()
    }

    pub fn albums(&self) -> BTreeSet<&str> {
        self.songs.values().map(|s| s.album.as_str()).collect()
    }

    /// Count one play of the stored song with this title. Returns the new count.
    pub fn record_play(&mut self, title: &str) -> Option<u32> {
        let song = self.songs.get_mut(&normalize_title(title))?;
        song.record_play();
        Some(song.play_count)
    }

    /// Flip the liked flag of the stored song. Returns the new value.
    pub fn toggle_liked(&mut self, title: &str) -> Option<bool> {
        let song = self.songs.get_mut(&normalize_title(title))?;
        song.liked = !song.liked;
        Some(song.liked)
    }
}

/// Every text field must survive the pipe-delimited save format.
fn validate(track: &Track) -> Result<(), LibraryError> {
    let invalid = |field: &'static str, reason: &'static str| LibraryError::InvalidField {
        title: track.title.clone(),
        field,
        reason,
    };

    if track.title.trim().is_empty() {
        return Err(invalid("title", "must not be empty"));
    }

    // The songs file is UTF-8; other bytes would not survive a save.
    let path = track
        .path
        .to_str()
        .ok_or_else(|| invalid("path", "must be valid UTF-8"))?;
    let artwork = match &track.artwork {
        Some(p) => p
            .to_str()
            .ok_or_else(|| invalid("artwork", "must be valid UTF-8"))?,
        None => "",
    };
    let fields: [(&'static str, &str); 6] = [
        ("title", &track.title),
        ("artist", &track.artist),
        ("album", &track.album),
        ("genre", &track.genre),
        ("path", path),
        ("artwork", artwork),
    ];
    for (name, value) in fields {
        if value.contains(['|', '\n', '\r']) {
            return Err(invalid(name, "must not contain '|' or line breaks"));
        }
    }
    Ok(())
}
