use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info, warn};

use crate::app::App;
use crate::config;
use crate::library;
use crate::player::{PlaybackController, PlaybackState, PlayerEvent, SoundOutput};
use crate::ui::{self, PlayerView};

/// Main terminal event loop: polls the controller, applies its events to the
/// library, draws, and handles input. Returns `Ok(())` when quit is requested.
pub fn run<O: SoundOutput>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<O>,
    events: &mpsc::Receiver<PlayerEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let poll = Duration::from_millis(settings.playback.poll_interval_ms);
    let songs_file = settings.songs_file();

    loop {
        controller.check_status();

        while let Ok(ev) = events.try_recv() {
            handle_player_event(ev, app);
        }

        terminal.draw(|f| {
            let player = PlayerView {
                current: controller.current(),
                queue: controller.queue(),
                history: controller.history(),
                state: controller.state(),
                position: controller.position(),
                volume: controller.volume(),
            };
            ui::draw(f, app, &player, &settings.ui, &settings.controls)
        })?;

        if event::poll(poll)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, &songs_file, app, controller) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Mirror controller changes into the library and the status line.
pub(super) fn handle_player_event(ev: PlayerEvent, app: &mut App) {
    match ev {
        PlayerEvent::CurrentTrackChanged(Some(track)) => {
            app.record_play(&track.title);
            app.set_status(format!("Now playing: {}", track.info()));
        }
        PlayerEvent::LoadFailed { title, reason } => {
            app.set_status(format!("Could not play '{title}': {reason}"));
        }
        PlayerEvent::CurrentTrackChanged(None)
        | PlayerEvent::QueueChanged(_)
        | PlayerEvent::StateChanged(_) => {}
    }
}

/// Handle one key press. Returns true when the user asked to quit.
fn handle_key_event<O: SoundOutput>(
    key: KeyEvent,
    settings: &config::Settings,
    songs_file: &Path,
    app: &mut App,
    controller: &mut PlaybackController<O>,
) -> bool {
    let scrub = Duration::from_secs(settings.controls.scrub_seconds);

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Tab => app.switch_view(),
        KeyCode::Backspace => {
            app.back();
        }
        KeyCode::Enter => {
            if !app.open_selected_album() {
                if let Some(track) = app.selected_track().cloned() {
                    controller.play_now(track);
                }
            }
        }
        KeyCode::Char('a') => {
            let tracks = app.selection_tracks();
            if !tracks.is_empty() {
                let n = tracks.len();
                controller.enqueue_all(tracks);
                app.set_status(format!("Queued {n} song(s)"));
            }
        }
        KeyCode::Char('P') => controller.play_all(app.playable_tracks()),
        KeyCode::Char('S') => controller.shuffle_all(app.playable_tracks()),
        KeyCode::Char(' ') => toggle_or_start(controller),
        KeyCode::Char('l') => controller.skip_next(),
        KeyCode::Char('h') => controller.play_previous(),
        KeyCode::Char('L') => {
            let to = controller.position() + scrub;
            if controller.seek(to).is_err() {
                app.set_status("Nothing to seek");
            }
        }
        KeyCode::Char('H') => {
            let to = controller.position().saturating_sub(scrub);
            if controller.seek(to).is_err() {
                app.set_status("Nothing to seek");
            }
        }
        KeyCode::Char('s') => {
            controller.stop();
            app.set_status("Stopped");
        }
        KeyCode::Char('f') => {
            if let Some((title, liked)) = app.toggle_liked_selected() {
                let verb = if liked { "Liked" } else { "Unliked" };
                app.set_status(format!("{verb} '{title}'"));
            }
        }
        KeyCode::Char('d') => {
            if let Some(title) = app.delete_selected() {
                info!(%title, "deleted song");
                app.set_status(format!("Deleted '{title}'"));
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            controller.set_volume(controller.volume() + settings.controls.volume_step);
        }
        KeyCode::Char('-') => {
            controller.set_volume(controller.volume() - settings.controls.volume_step);
        }
        KeyCode::Char('w') => save_library(app, songs_file),
        _ => debug!(?key, "unbound key"),
    }

    false
}

/// Pause or resume; when idle, start whatever is queued.
pub(super) fn toggle_or_start<O: SoundOutput>(controller: &mut PlaybackController<O>) {
    if controller.state() == PlaybackState::Idle {
        controller.advance();
    } else {
        controller.toggle();
    }
}

/// Write the library to `path`, reporting the outcome in the status line.
pub(super) fn save_library(app: &mut App, path: &Path) {
    match library::save(&app.library, path) {
        Ok(n) => {
            app.mark_saved();
            info!(songs = n, path = %path.display(), "saved library");
            app.set_status(format!("Saved {n} songs"));
        }
        Err(e) => {
            warn!(path = %path.display(), "save failed: {e}");
            app.set_status(format!("Save failed: {e}"));
        }
    }
}
