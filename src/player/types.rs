use thiserror::Error;

use crate::library::Track;

/// Where the controller is in its Idle / Playing / Paused cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// No current track.
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Change notifications delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// A new track became current (`Some`), or nothing is current any more (`None`).
    CurrentTrackChanged(Option<Track>),
    /// The pending queue after the change.
    QueueChanged(Vec<Track>),
    StateChanged(PlaybackState),
    /// A track could not be loaded and was dropped from the queue.
    LoadFailed { title: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("no track loaded")]
    NoTrackLoaded,
}
