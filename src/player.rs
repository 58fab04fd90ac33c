//! Playback queue controller.
//!
//! `PlaybackController` owns the current track, the pending queue, the play
//! history and the play/pause state. It has no threads or timers of its own:
//! the front end calls [`PlaybackController::check_status`] on a fixed cadence
//! to notice finished tracks, and every other operation runs to completion
//! synchronously.

mod controller;
mod output;
mod types;

pub use controller::{ControllerOptions, PlaybackController};
pub use output::{OutputError, SoundOutput};
pub use types::{PlaybackError, PlaybackState, PlayerEvent};
