//! Application module: exposes the view model used by the TUI and runtime.
//!
//! `App` owns the song library and tracks which view is shown and which row
//! is selected. Playback state lives in the controller, not here.

mod model;

pub use model::*;
