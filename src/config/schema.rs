use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Everything musicify reads from `config.toml`.
///
/// The file lives at `$MUSICIFY_CONFIG_PATH`, else
/// `$XDG_CONFIG_HOME/musicify/config.toml`, else `~/.config/musicify/config.toml`.
/// Missing keys take the defaults below; `MUSICIFY__SECTION__KEY` environment
/// variables override both.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial output volume, 0.0 to 1.0.
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Start playing right away when a track is queued while idle.
    pub auto_start_on_enqueue: bool,
    /// "Previous" restarts the current track instead once it has played longer than this.
    pub restart_threshold_secs: u64,
    /// How often the front end polls for a finished track (milliseconds).
    pub poll_interval_ms: u64,
    /// Keep at most this many tracks in the play history.
    pub history_limit: Option<usize>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            auto_start_on_enqueue: true,
            restart_threshold_secs: 10,
            poll_interval_ms: 200,
            history_limit: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    Album,
    Genre,
    Filename,
    Path,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Songs file. Defaults to `$XDG_DATA_HOME/musicify/songs.txt`.
    pub songs_file: Option<PathBuf>,
    /// Write the songs file back when quitting.
    pub save_on_exit: bool,

    // Directory import.
    /// Audio extensions, matched case-insensitively.
    pub extensions: Vec<String>,
    pub follow_links: bool,
    /// Import dotfiles and files inside dot-directories.
    pub include_hidden: bool,
    pub recursive: bool,
    /// Deepest level walked below the import directory (1 = its own files).
    pub max_depth: Option<usize>,

    /// Fields joined with `display_separator` to label a song in lists,
    /// e.g. `["artist", "title"]` gives "Artist - Title".
    pub display_fields: Vec<TrackDisplayField>,
    pub display_separator: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            songs_file: None,
            save_on_exit: true,
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
            display_fields: vec![TrackDisplayField::Artist, TrackDisplayField::Title],
            display_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    pub header_text: String,
    /// Time readouts after the current song in the status box.
    pub now_playing_time_fields: Vec<TimeField>,
    pub now_playing_time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ musicify ~ ".to_string(),
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total, TimeField::Remaining],
            now_playing_time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to seek when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Log file. Defaults to `musicify.log` next to the songs file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
