use std::collections::VecDeque;
use std::time::Duration;

use super::*;
use crate::config::{ControlsSettings, LibrarySettings, UiSettings};
use crate::library::{Library, Track};

fn song() -> Track {
    Track::new("Song", "Band", "Record", 1, 125, "Jazz", "/music/song.mp3")
}

#[test]
fn time_text_follows_configured_fields() {
    let ui = UiSettings::default();
    assert_eq!(
        now_playing_time_text(Duration::from_secs(65), Duration::from_secs(125), &ui).as_deref(),
        Some("01:05 / 02:05 / -01:00")
    );

    let ui = UiSettings {
        now_playing_time_fields: vec![TimeField::Remaining],
        ..UiSettings::default()
    };
    // Past the end never goes negative.
    assert_eq!(
        now_playing_time_text(Duration::from_secs(200), Duration::from_secs(125), &ui).as_deref(),
        Some("-00:00")
    );

    let ui = UiSettings {
        now_playing_time_fields: Vec::new(),
        ..UiSettings::default()
    };
    assert_eq!(
        now_playing_time_text(Duration::ZERO, Duration::ZERO, &ui),
        None
    );
}

#[test]
fn status_shows_song_state_volume_and_queue() {
    let mut app = App::new(Library::new(), &LibrarySettings::default());
    let track = song();
    let queue: VecDeque<Track> = VecDeque::from(vec![song(), song()]);
    let player = PlayerView {
        current: Some(&track),
        queue: &queue,
        history: &[],
        state: PlaybackState::Paused,
        position: Duration::from_secs(5),
        volume: 0.5,
    };
    app.set_status("Saved 3 songs");

    assert_eq!(
        status_text(&app, &player, &UiSettings::default()),
        "Song: Song - Band [00:05 / 02:05 / -02:00] • Paused • Vol: 50% • Queue: 2 • Saved 3 songs"
    );
}

#[test]
fn status_when_idle() {
    let app = App::new(Library::new(), &LibrarySettings::default());
    let queue = VecDeque::new();
    let player = PlayerView {
        current: None,
        queue: &queue,
        history: &[],
        state: PlaybackState::Idle,
        position: Duration::ZERO,
        volume: 1.0,
    };
    assert_eq!(
        status_text(&app, &player, &UiSettings::default()),
        "Nothing playing • Stopped • Vol: 100% • Queue: 0"
    );
}

#[test]
fn controls_text_includes_scrub_seconds() {
    let text = controls_text(7);
    assert!(text.contains("[h/l] prev/next | [H/L] scrub -/+7s | [s] stop"));
    assert!(text.ends_with("[q] quit"));
}

#[test]
fn played_panel_lists_history_newest_first() {
    use ratatui::{Terminal, backend::TestBackend};

    let app = App::new(Library::new(), &LibrarySettings::default());
    let queue = VecDeque::new();
    let history = vec![
        Track::new("First", "Band", "Record", 1, 60, "Jazz", "/music/first.mp3"),
        Track::new("Second", "Band", "Record", 2, 60, "Jazz", "/music/second.mp3"),
    ];
    let player = PlayerView {
        current: None,
        queue: &queue,
        history: &history,
        state: PlaybackState::Idle,
        position: Duration::ZERO,
        volume: 1.0,
    };

    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal
        .draw(|f| {
            draw(
                f,
                &app,
                &player,
                &UiSettings::default(),
                &ControlsSettings::default(),
            )
        })
        .unwrap();

    let buffer = terminal.backend().buffer();
    let rows: Vec<String> = (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect()
        })
        .collect();
    let row_of = |needle: &str| rows.iter().position(|r| r.contains(needle));

    assert!(row_of(" played (2) ").is_some());
    let second = row_of("Second - Band").unwrap();
    let first = row_of("First - Band").unwrap();
    assert!(second < first);
}
