use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Send `tracing` output to `path`; the terminal belongs to the TUI.
///
/// `RUST_LOG` overrides the configured level. Returns false, leaving logging
/// disabled, when the file cannot be opened.
pub fn init(settings: &LoggingSettings, path: &Path) -> bool {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("musicify: logging disabled, cannot create {}: {e}", dir.display());
            return false;
        }
    }
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("musicify: logging disabled, cannot open {}: {e}", path.display());
            return false;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok()
}
