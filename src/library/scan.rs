use std::borrow::Cow;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use lofty::prelude::*;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::display_from_fields;
use super::model::Track;

const ARTWORK_NAMES: [&str; 4] = ["cover.jpg", "cover.png", "folder.jpg", "folder.png"];

/// Lowercased extensions from the settings, leading dots dropped.
fn wanted_extensions(settings: &LibrarySettings) -> HashSet<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn has_wanted_extension(path: &Path, wanted: &HashSet<String>) -> bool {
    match path.extension().and_then(OsStr::to_str) {
        Some(ext) => wanted.contains(&ext.to_lowercase()),
        None => false,
    }
}

fn is_dotfile(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

/// Tag values end up in the pipe-delimited songs file.
fn clean_field(s: &str) -> String {
    s.chars()
        .map(|c| if c == '|' || c.is_control() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

fn non_empty(v: Option<Cow<'_, str>>) -> Option<String> {
    v.map(|v| clean_field(&v)).filter(|v| !v.is_empty())
}

fn find_artwork(audio: &Path) -> Option<PathBuf> {
    let dir = audio.parent()?;
    ARTWORK_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

fn read_track(path: &Path) -> Track {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(clean_field)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "UNKNOWN".to_string());

    let mut track = Track::new(
        stem,
        "Unknown Artist",
        "Unknown Album",
        0,
        0,
        "Unknown",
        path.to_path_buf(),
    );

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            track.duration =
                u32::try_from(tagged.properties().duration().as_secs()).unwrap_or(u32::MAX);

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = non_empty(tag.title()) {
                    track.title = v;
                }
                if let Some(v) = non_empty(tag.artist()) {
                    track.artist = v;
                }
                if let Some(v) = non_empty(tag.album()) {
                    track.album = v;
                }
                if let Some(v) = non_empty(tag.genre()) {
                    track.genre = v;
                }
                if let Some(n) = tag.track() {
                    track.track_number = n;
                }
            }
        }
        Err(e) => debug!(path = %path.display(), "no readable tags: {e}"),
    }

    track.artwork = find_artwork(path);
    track
}

/// Walk `dir` and build a track record for every audio file found.
///
/// Files without readable tags still produce a record titled after the file stem.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let wanted = wanted_extensions(settings);
    // Depth 1 is the directory's own entries.
    let max_depth = if settings.recursive {
        settings.max_depth.unwrap_or(usize::MAX)
    } else {
        1
    };
    let skip_hidden = !settings.include_hidden;

    let mut tracks: Vec<Track> = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .max_depth(max_depth)
        .into_iter()
        // The root itself is scanned even when it is a dotdir.
        .filter_entry(|e| e.depth() == 0 || !(skip_hidden && is_dotfile(e.file_name())))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                debug!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_wanted_extension(e.path(), &wanted))
        .map(|e| read_track(e.path()))
        .collect();

    tracks.sort_by_cached_key(|t| {
        display_from_fields(t, &settings.display_fields, &settings.display_separator)
            .to_lowercase()
    });
    debug!(dir = %dir.display(), count = tracks.len(), "scanned directory");
    tracks
}
