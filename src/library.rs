//! Song library: track records, the keyed song store, the pipe-delimited
//! save format and directory import.

mod display;
mod model;
mod persist;
mod scan;
mod store;

pub use display::{display_from_fields, format_duration};
pub use model::Track;
pub use persist::{LoadReport, load, save};
pub use scan::scan;
pub use store::{ImportReport, Library, LibraryError, normalize_title};
