use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("nothing loaded")]
    NothingLoaded,

    #[error("audio device error: {0}")]
    Device(String),
}

/// The audio device the controller drives.
///
/// Playback completion is never pushed to the caller; it is observed by
/// polling [`SoundOutput::is_busy`].
pub trait SoundOutput {
    /// Prepare the file at `path` for playback, replacing whatever was loaded.
    fn load(&mut self, path: &Path) -> Result<(), OutputError>;

    /// Start the loaded file from `start`, discarding any playback in progress.
    fn play(&mut self, start: Duration) -> Result<(), OutputError>;

    fn pause(&mut self);

    fn unpause(&mut self);

    fn stop(&mut self);

    /// Whether audio is still queued on the device (false once a file ran out or after `stop`).
    fn is_busy(&self) -> bool;

    /// Time played since the last `play`. `None` when the device cannot say,
    /// e.g. right after a seek.
    fn elapsed(&self) -> Option<Duration>;

    /// Volume from 0.0 to 1.0.
    fn set_volume(&mut self, volume: f32);
}
