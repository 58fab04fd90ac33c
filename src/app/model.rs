//! Application model types: `App` and `View`.

use crate::config::{LibrarySettings, TrackDisplayField};
use crate::library::{Library, Track, display_from_fields};

/// Which list the main panel shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum View {
    /// Every song, sorted by artist, album, track number.
    #[default]
    AllSongs,
    /// One row per album.
    Albums,
    /// The songs of a single album.
    Album(String),
}

/// The main application model.
pub struct App {
    pub library: Library,
    pub view: View,
    pub selected: usize,
    pub status: Option<String>,

    display_fields: Vec<TrackDisplayField>,
    display_separator: String,
    // Library changed since the last save.
    dirty: bool,
}

impl App {
    pub fn new(library: Library, settings: &LibrarySettings) -> Self {
        Self {
            library,
            view: View::AllSongs,
            selected: 0,
            status: None,
            display_fields: settings.display_fields.clone(),
            display_separator: settings.display_separator.clone(),
            dirty: false,
        }
    }

    /// Tracks shown in the current view. Empty in the album list.
    pub fn view_tracks(&self) -> Vec<&Track> {
        match &self.view {
            View::AllSongs => self.library.list_all(),
            View::Albums => Vec::new(),
            View::Album(name) => self.album_tracks(name),
        }
    }

    pub fn album_names(&self) -> Vec<String> {
        self.library.group_by_album().into_keys().collect()
    }

    fn album_tracks(&self, name: &str) -> Vec<&Track> {
        self.library
            .group_by_album()
            .remove(name)
            .unwrap_or_default()
    }

    /// Number of rows in the current view.
    pub fn len(&self) -> usize {
        match &self.view {
            View::Albums => self.album_names().len(),
            _ => self.view_tracks().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rendered rows for the main list.
    pub fn rows(&self) -> Vec<String> {
        match &self.view {
            View::Albums => self
                .library
                .group_by_album()
                .into_iter()
                .map(|(name, tracks)| format!("{name} ({} songs)", tracks.len()))
                .collect(),
            _ => self
                .view_tracks()
                .into_iter()
                .map(|t| self.track_row(t))
                .collect(),
        }
    }

    fn track_row(&self, track: &Track) -> String {
        let text = display_from_fields(track, &self.display_fields, &self.display_separator);
        let liked = if track.liked { " ♥" } else { "" };
        format!("{text} [{}]{liked}", track.duration_text())
    }

    pub fn title(&self) -> String {
        match &self.view {
            View::AllSongs => format!(
                " all songs ({}, {} albums, {} genres) ",
                self.library.len(),
                self.library.albums().len(),
                self.library.genres().len()
            ),
            View::Albums => " albums ".to_string(),
            View::Album(name) => format!(" album: {name} "),
        }
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.view_tracks().get(self.selected).copied()
    }

    pub fn selected_album(&self) -> Option<String> {
        match &self.view {
            View::Albums => self.album_names().into_iter().nth(self.selected),
            _ => None,
        }
    }

    /// What `a` queues: the selected album's songs in the album list,
    /// otherwise the selected song.
    pub fn selection_tracks(&self) -> Vec<Track> {
        match self.selected_album() {
            Some(name) => self.album_tracks(&name).into_iter().cloned().collect(),
            None => self.selected_track().cloned().into_iter().collect(),
        }
    }

    /// What `P` / `S` play: the whole view, or the selected album in the album list.
    pub fn playable_tracks(&self) -> Vec<Track> {
        match &self.view {
            View::Albums => self.selection_tracks(),
            _ => self.view_tracks().into_iter().cloned().collect(),
        }
    }

    /// Move selection to the next row, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous row, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Open the selected album. Returns false outside the album list.
    pub fn open_selected_album(&mut self) -> bool {
        match self.selected_album() {
            Some(name) => {
                self.set_view(View::Album(name));
                true
            }
            None => false,
        }
    }

    /// Toggle between all songs and the album list.
    pub fn switch_view(&mut self) {
        let next = match self.view {
            View::AllSongs => View::Albums,
            View::Albums | View::Album(_) => View::AllSongs,
        };
        self.set_view(next);
    }

    /// Leave an album for the album list. Returns whether the view changed.
    pub fn back(&mut self) -> bool {
        let View::Album(name) = &self.view else {
            return false;
        };
        let name = name.clone();
        self.set_view(View::Albums);
        if let Some(pos) = self.album_names().iter().position(|n| *n == name) {
            self.selected = pos;
        }
        true
    }

    fn set_view(&mut self, view: View) {
        self.view = view;
        self.selected = 0;
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Flip the liked flag of the selected song.
    pub fn toggle_liked_selected(&mut self) -> Option<(String, bool)> {
        let title = self.selected_track()?.title.clone();
        let liked = self.library.toggle_liked(&title)?;
        self.dirty = true;
        Some((title, liked))
    }

    /// Remove the selected song from the library. Returns its title.
    pub fn delete_selected(&mut self) -> Option<String> {
        let title = self.selected_track()?.title.clone();
        if !self.library.delete(&title) {
            return None;
        }
        self.dirty = true;
        if self.is_empty() && matches!(self.view, View::Album(_)) {
            self.set_view(View::Albums);
        }
        self.clamp_selection();
        Some(title)
    }

    /// Count a play of `title` in the library.
    pub fn record_play(&mut self, title: &str) {
        if self.library.record_play(title).is_some() {
            self.dirty = true;
        }
    }

    /// Library changes from an import count as unsaved.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn clamp_selection(&mut self) {
        let len = self.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}
