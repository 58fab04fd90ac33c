use std::path::PathBuf;

use super::display::format_duration;

/// A single playable song and its metadata.
///
/// Two tracks are the same library entry when their titles match
/// case-insensitively (see [`Track::key`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub track_number: u32,
    /// Length in whole seconds.
    pub duration: u32,
    pub genre: String,
    pub path: PathBuf,
    pub artwork: Option<PathBuf>,
    pub liked: bool,
    pub play_count: u32,
}

impl Track {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        track_number: u32,
        duration: u32,
        genre: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            track_number,
            duration,
            genre: genre.into(),
            path: path.into(),
            artwork: None,
            liked: false,
            play_count: 0,
        }
    }

    /// Library identity key: the lowercased title.
    pub fn key(&self) -> String {
        super::normalize_title(&self.title)
    }

    /// Count one more play of this track.
    pub fn record_play(&mut self) {
        self.play_count = self.play_count.saturating_add(1);
    }

    /// Short "`N. Title - Artist`" line used in album listings.
    pub fn info(&self) -> String {
        format!("{}. {} - {}", self.track_number, self.title, self.artist)
    }

    /// Formatted length as `m:ss`.
    pub fn duration_text(&self) -> String {
        format_duration(i64::from(self.duration))
    }
}
