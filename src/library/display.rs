use crate::config::TrackDisplayField;

use super::model::Track;

/// Build a display string for `track` according to the provided `fields` and separator.
///
/// Composes metadata fields in the configured order and falls back to the
/// title when no parts were produced.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        let part = match f {
            TrackDisplayField::Title => Some(track.title.trim().to_string()),
            TrackDisplayField::Artist => Some(track.artist.trim().to_string()),
            TrackDisplayField::Album => Some(track.album.trim().to_string()),
            TrackDisplayField::Genre => Some(track.genre.trim().to_string()),
            TrackDisplayField::Filename => track
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.trim().to_string()),
            TrackDisplayField::Path => Some(track.path.display().to_string()),
        };
        if let Some(p) = part.filter(|p| !p.is_empty()) {
            parts.push(p);
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}

/// Format a number of seconds as `m:ss`. Negative values clamp to `0:00`.
pub fn format_duration(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    format!("{}:{:02}", total / 60, total % 60)
}
