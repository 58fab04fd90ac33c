//! UI rendering for the terminal front end.
//!
//! This module contains functions to render the TUI using `ratatui`.

use std::collections::VecDeque;
use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::library::Track;
use crate::player::PlaybackState;

#[cfg(test)]
mod tests;

/// Snapshot of the controller taken once per frame.
pub struct PlayerView<'a> {
    pub current: Option<&'a Track>,
    pub queue: &'a VecDeque<Track>,
    /// Oldest first.
    pub history: &'a [Track],
    pub state: PlaybackState,
    pub position: Duration,
    pub volume: f32,
}

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("enter", "play / open album"),
    ("a", "enqueue"),
    ("P/S", "play/shuffle view"),
    ("space", "play/pause/start queue"),
    ("h/l", "prev/next"),
    // H/L is filled in from config.
    ("s", "stop"),
    ("f", "like"),
    ("d", "delete"),
    ("+/-", "volume"),
    ("tab", "songs/albums"),
    ("backspace", "back"),
    ("w", "save"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let mut parts: Vec<String> = CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect();
    parts.insert(6, format!("[H/L] scrub -/+{scrub_seconds}s"));
    parts.join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(elapsed: Duration, total: Duration, ui: &UiSettings) -> Option<String> {
    let parts: Vec<String> = ui
        .now_playing_time_fields
        .iter()
        .map(|f| match f {
            TimeField::Elapsed => format_mmss(elapsed),
            TimeField::Total => format_mmss(total),
            TimeField::Remaining => format!("-{}", format_mmss(total.saturating_sub(elapsed))),
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

/// The status line: now playing, state, volume, queue length and the last message.
fn status_text(app: &App, player: &PlayerView<'_>, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();

    match player.current {
        Some(track) => {
            let total = Duration::from_secs(u64::from(track.duration));
            let song = format!("{} - {}", track.title, track.artist);
            match now_playing_time_text(player.position, total, ui) {
                Some(time) => parts.push(format!("Song: {song} [{time}]")),
                None => parts.push(format!("Song: {song}")),
            }
        }
        None => parts.push("Nothing playing".to_string()),
    }

    parts.push(
        match player.state {
            PlaybackState::Idle => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
        .to_string(),
    );
    parts.push(format!("Vol: {:.0}%", player.volume * 100.0));
    parts.push(format!("Queue: {}", player.queue.len()));

    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

fn side_item(track: &Track) -> ListItem<'static> {
    ListItem::new(format!("{} - {}", track.title, track.artist))
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    player: &PlayerView<'_>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" musicify ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app, player, ui_settings))
        .block(
            Block::bordered()
                .padding(Padding::left(1))
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[2]);

    // Main list: only build items for the visible window, centered on the selection.
    {
        let rows = app.rows();
        let total = rows.len();
        let height = body[0].height.saturating_sub(2) as usize;
        let sel = app.selected.min(total.saturating_sub(1));
        let (start, end) = if total <= height || height == 0 {
            (0, total)
        } else {
            let mut start = sel.saturating_sub(height / 2);
            if start + height > total {
                start = total - height;
            }
            (start, start + height)
        };

        let items: Vec<ListItem> = rows[start..end]
            .iter()
            .map(|r| ListItem::new(r.as_str()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(app.title()))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(sel - start));
        }
        frame.render_stateful_widget(list, body[0], &mut state);
    }

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(body[1]);

    let queue: Vec<ListItem> = player.queue.iter().map(side_item).collect();
    let queue = List::new(queue).block(Block::default().borders(Borders::ALL).title(" queue "));
    frame.render_widget(queue, side[0]);

    let played: Vec<ListItem> = player.history.iter().rev().map(side_item).collect();
    let played = List::new(played).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" played ({}) ", player.history.len())),
    );
    frame.render_widget(played, side[1]);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding::left(1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
