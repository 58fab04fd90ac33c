use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use super::event_loop::{handle_player_event, save_library, toggle_or_start};
use super::{import_dir, shutdown};
use crate::app::App;
use crate::config::LibrarySettings;
use crate::library::{self, Library, Track};
use crate::player::{
    ControllerOptions, OutputError, PlaybackController, PlaybackState, PlayerEvent, SoundOutput,
};

/// Plays forever until stopped.
#[derive(Clone, Default)]
struct SilentOutput {
    busy: Rc<Cell<bool>>,
}

impl SoundOutput for SilentOutput {
    fn load(&mut self, _path: &Path) -> Result<(), OutputError> {
        Ok(())
    }

    fn play(&mut self, _start: Duration) -> Result<(), OutputError> {
        self.busy.set(true);
        Ok(())
    }

    fn pause(&mut self) {}

    fn unpause(&mut self) {}

    fn stop(&mut self) {
        self.busy.set(false);
    }

    fn is_busy(&self) -> bool {
        self.busy.get()
    }

    fn elapsed(&self) -> Option<Duration> {
        Some(Duration::ZERO)
    }

    fn set_volume(&mut self, _volume: f32) {}
}

fn controller_with_channel(
    options: ControllerOptions,
) -> (
    PlaybackController<SilentOutput>,
    mpsc::Receiver<PlayerEvent>,
) {
    let mut controller = PlaybackController::new(SilentOutput::default(), options);
    let (tx, rx) = mpsc::channel();
    controller.subscribe(move |ev| {
        let _ = tx.send(ev.clone());
    });
    (controller, rx)
}

fn app_with(titles: &[&str]) -> App {
    let mut lib = Library::new();
    for t in titles {
        lib.add(Track::new(*t, "Artist", "Album", 1, 60, "Pop", format!("/m/{t}.mp3")))
            .unwrap();
    }
    App::new(lib, &LibrarySettings::default())
}

#[test]
fn import_adds_new_files_and_counts_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("one.mp3"), b"").unwrap();
    fs::write(dir.path().join("two.flac"), b"").unwrap();
    fs::write(dir.path().join("notes.txt"), b"").unwrap();

    let mut app = app_with(&["Two"]);
    import_dir(&mut app, dir.path(), &LibrarySettings::default());

    assert_eq!(app.library.len(), 2);
    assert!(app.library.get("one").is_some());
    assert!(app.is_dirty());
    assert_eq!(
        app.status.as_deref(),
        Some("Imported 1 songs (1 duplicates, 0 invalid)")
    );
}

#[test]
fn importing_nothing_new_keeps_library_clean() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_with(&[]);
    import_dir(&mut app, dir.path(), &LibrarySettings::default());
    assert!(!app.is_dirty());
}

#[test]
fn new_current_track_counts_a_play() {
    let mut app = app_with(&["Song"]);
    let mut playing = app.library.get("Song").unwrap().clone();
    playing.record_play();

    handle_player_event(PlayerEvent::CurrentTrackChanged(Some(playing)), &mut app);
    assert_eq!(app.library.get("Song").unwrap().play_count, 1);
    assert_eq!(app.status.as_deref(), Some("Now playing: 1. Song - Artist"));

    // Other notifications leave the library alone.
    handle_player_event(PlayerEvent::StateChanged(PlaybackState::Paused), &mut app);
    handle_player_event(PlayerEvent::CurrentTrackChanged(None), &mut app);
    assert_eq!(app.library.get("Song").unwrap().play_count, 1);
}

#[test]
fn load_failure_is_reported_in_status() {
    let mut app = app_with(&[]);
    handle_player_event(
        PlayerEvent::LoadFailed {
            title: "Broken".into(),
            reason: "nothing loaded".into(),
        },
        &mut app,
    );
    assert_eq!(
        app.status.as_deref(),
        Some("Could not play 'Broken': nothing loaded")
    );
}

#[test]
fn save_writes_library_and_clears_dirty_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("songs.txt");
    let mut app = app_with(&["A", "B"]);
    app.mark_dirty();

    save_library(&mut app, &path);
    assert!(!app.is_dirty());
    assert_eq!(app.status.as_deref(), Some("Saved 2 songs"));

    let mut reloaded = Library::new();
    let report = library::load(&mut reloaded, &path).unwrap();
    assert_eq!(report.loaded, 2);
}

#[test]
fn failed_save_keeps_changes_pending() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where a directory is needed.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"x").unwrap();
    let mut app = app_with(&["A"]);
    app.mark_dirty();

    save_library(&mut app, &blocker.join("songs.txt"));
    assert!(app.is_dirty());
    assert!(app.status.as_deref().unwrap().starts_with("Save failed"));
}

#[test]
fn shutdown_counts_pending_plays_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("songs.txt");
    let mut app = app_with(&["Song"]);
    let (mut controller, events) = controller_with_channel(ControllerOptions::default());
    controller.enqueue(app.library.get("Song").unwrap().clone());
    assert_eq!(controller.state(), PlaybackState::Playing);

    let saved = shutdown(&mut controller, &events, &mut app, &LibrarySettings::default(), &path);
    assert!(saved);
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert!(!app.is_dirty());

    let mut reloaded = Library::new();
    library::load(&mut reloaded, &path).unwrap();
    assert_eq!(reloaded.get("Song").unwrap().play_count, 1);
}

#[test]
fn shutdown_leaves_the_file_alone_when_saving_is_off() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("songs.txt");
    let mut app = app_with(&["Song"]);
    app.mark_dirty();
    let (mut controller, events) = controller_with_channel(ControllerOptions::default());
    let settings = LibrarySettings {
        save_on_exit: false,
        ..LibrarySettings::default()
    };

    assert!(!shutdown(&mut controller, &events, &mut app, &settings, &path));
    assert!(app.is_dirty());
    assert!(!path.exists());
}

#[test]
fn space_starts_the_queue_when_idle_and_toggles_otherwise() {
    let app = app_with(&["A", "B"]);
    let options = ControllerOptions {
        auto_start_on_enqueue: false,
        ..ControllerOptions::default()
    };
    let (mut controller, _events) = controller_with_channel(options);
    controller.enqueue(app.library.get("A").unwrap().clone());
    assert_eq!(controller.state(), PlaybackState::Idle);

    toggle_or_start(&mut controller);
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(controller.current().map(|t| t.title.as_str()), Some("A"));

    toggle_or_start(&mut controller);
    assert_eq!(controller.state(), PlaybackState::Paused);
    toggle_or_start(&mut controller);
    assert_eq!(controller.state(), PlaybackState::Playing);
}
