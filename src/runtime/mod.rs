use std::env;
use std::io;
use std::path::Path;
use std::sync::mpsc;

use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::RodioOutput;
use crate::library::{self, Library};
use crate::config::LibrarySettings;
use crate::player::{ControllerOptions, PlaybackController, PlayerEvent, SoundOutput};

mod event_loop;
mod logging;
mod settings;

#[cfg(test)]
mod tests;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let arg = env::args().nth(1);
    let (settings, fallback) = settings::load_settings();

    if arg.as_deref() == Some("--print-config") {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    if let Some(msg) = &fallback {
        eprintln!("musicify: {msg}");
    }
    logging::init(&settings.logging, &settings.log_file());
    if let Some(msg) = fallback {
        warn!("{msg}");
    }

    let songs_file = settings.songs_file();
    let mut lib = Library::new();
    let report = library::load(&mut lib, &songs_file)?;
    info!(
        loaded = report.loaded,
        skipped = report.skipped,
        path = %songs_file.display(),
        "loaded library"
    );

    let mut app = App::new(lib, &settings.library);
    if let Some(dir) = arg {
        import_dir(&mut app, Path::new(&dir), &settings.library);
    }

    let output = RodioOutput::open()?;
    let mut controller =
        PlaybackController::new(output, ControllerOptions::from(&settings.playback));
    controller.set_volume(settings.audio.volume);

    let (event_tx, event_rx) = mpsc::channel::<PlayerEvent>();
    controller.subscribe(move |ev| {
        let _ = event_tx.send(ev.clone());
    });

    let run_result = (|| -> Result<(), Box<dyn std::error::Error>> {
        let _guard = TerminalGuard::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        event_loop::run(&mut terminal, &settings, &mut app, &mut controller, &event_rx)
    })();

    if shutdown(&mut controller, &event_rx, &mut app, &settings.library, &songs_file) {
        if let Some(msg) = &app.status {
            eprintln!("musicify: {msg}");
        }
    }

    run_result
}

/// Raw mode and the alternate screen, undone on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("failed to leave raw mode: {e}");
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
            warn!("failed to restore the screen: {e}");
        }
    }
}

/// Stop playback, count plays still in flight and save pending changes.
/// Returns whether a save was attempted.
fn shutdown<O: SoundOutput>(
    controller: &mut PlaybackController<O>,
    events: &mpsc::Receiver<PlayerEvent>,
    app: &mut App,
    settings: &LibrarySettings,
    songs_file: &Path,
) -> bool {
    controller.stop();
    // Plays counted after the last draw.
    while let Ok(ev) = events.try_recv() {
        event_loop::handle_player_event(ev, app);
    }
    let save = settings.save_on_exit && app.is_dirty();
    if save {
        event_loop::save_library(app, songs_file);
    }
    save
}

/// Scan `dir` and add what it finds to the library.
fn import_dir(app: &mut App, dir: &Path, settings: &LibrarySettings) {
    let tracks = library::scan(dir, settings);
    let report = app.library.import(tracks);
    info!(
        dir = %dir.display(),
        added = report.added,
        duplicates = report.duplicates,
        invalid = report.invalid,
        "imported directory"
    );
    if report.added > 0 {
        app.mark_dirty();
    }
    app.set_status(format!(
        "Imported {} songs ({} duplicates, {} invalid)",
        report.added, report.duplicates, report.invalid
    ));
}
