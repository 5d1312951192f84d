//! UI rendering for the terminal user interface.
//!
//! This module renders the TUI with `ratatui`: header, tabs, status box,
//! track list, lyrics pane and the controls footer.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Tabs, Wrap},
};
use std::time::{Duration, Instant};

use crate::app::{App, LyricsView};
use crate::catalog::Tab;
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::player::PlaybackState;

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating the seek step.
fn controls_text(seek_seconds: u64) -> String {
    let entries = [
        ("n/p", "down/up".to_string()),
        ("g/G", "top/bottom".to_string()),
        ("enter", "play selected".to_string()),
        ("space", "play/pause".to_string()),
        ("left/right", "prev/next song".to_string()),
        ("j/l", format!("seek -/+{seek_seconds}s")),
        ("up/down", "volume".to_string()),
        ("m", "mute".to_string()),
        ("f", "like".to_string()),
        ("tab", "favorites".to_string()),
        ("/", "search".to_string()),
        ("s", "shuffle".to_string()),
        ("r", "repeat".to_string()),
        ("y", "lyrics".to_string()),
        ("q", "quit".to_string()),
    ];
    entries
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

/// The `[start, end)` slice of a `total`-row list to show in `height` rows,
/// keeping `selected` centered when possible, plus its row within the window.
fn list_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Vertical scroll that puts line `active` in the middle of `height` rows.
fn lyric_scroll(active: Option<usize>, height: u16) -> u16 {
    let active = active.unwrap_or(0) as u16;
    active.saturating_sub(height / 2)
}

fn status_text(app: &App, playback: &PlaybackState, ui: &UiSettings, now: Instant) -> String {
    let mut parts: Vec<String> = Vec::new();

    match &playback.current {
        Some(track) => {
            let song = track.display();
            match now_playing_time_text(playback.position, playback.duration, ui) {
                Some(time) => parts.push(format!(" Song: {song} [{time}]")),
                None => parts.push(format!(" Song: {song}")),
            }
            let state = if playback.is_playing { "Playing" } else { "Paused" };
            parts.push(state.to_string());
        }
        None => parts.push(" Stopped".to_string()),
    }

    if playback.volume <= 0.0 {
        parts.push("Volume: muted".to_string());
    } else {
        parts.push(format!("Volume: {:.0}%", playback.volume * 100.0));
    }

    let shuffle = if playback.shuffle { "ON" } else { "OFF" };
    parts.push(format!("Shuffle: {shuffle}"));
    parts.push(format!("Repeat: {}", playback.repeat.label()));

    let cursor = if app.follow_playback { "Follow" } else { "Free-roam" };
    parts.push(format!("Cursor: {cursor}"));

    let q = app.filter_query.trim();
    if app.filter_mode || !q.is_empty() {
        let mut filter_part = String::from("Search:");
        if !q.is_empty() {
            filter_part.push(' ');
            filter_part.push_str(q);
        }
        if app.filter_mode {
            filter_part.push('_');
        }
        parts.push(filter_part);
    }

    if let Some(toast) = app.active_toast(now) {
        parts.push(format!("» {toast}"));
    }

    parts.join(" • ")
}

fn draw_track_list(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    playback: &PlaybackState,
    display: &[usize],
) {
    let block = Block::default().borders(Borders::ALL).title(" tracks ");

    if let Some(message) = app.empty_message(&playback.liked) {
        let empty = Paragraph::new(message)
            .alignment(Alignment::Center)
            .italic()
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Only build ListItems for the visible window.
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, selected_in_window) = list_window(display.len(), height, sel_pos);
    let playing_id = playback.current_id();

    let items: Vec<ListItem> = display[start..end]
        .iter()
        .map(|&i| {
            let track = &app.catalog[i];
            let heart = if playback.is_liked(track.id) { "♥ " } else { "  " };
            let mut spans = vec![
                Span::styled(heart, Style::default().fg(Color::Red)),
                Span::raw(track.display()),
            ];
            if playing_id == Some(track.id) {
                let marker = if playback.is_playing { "  ▶" } else { "  ⏸" };
                spans.push(Span::styled(marker, Style::default().fg(Color::Green)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected_in_window));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_lyrics(frame: &mut Frame, area: Rect, app: &App, playback: &PlaybackState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" lyrics ")
        .padding(LEFT_PAD);

    let placeholder = |text: &'static str| {
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .italic()
            .block(block.clone())
    };

    if playback.current.is_none() {
        frame.render_widget(placeholder("Nothing playing."), area);
        return;
    }

    match &app.lyrics.view {
        LyricsView::Idle | LyricsView::Loading => {
            frame.render_widget(placeholder("Loading lyrics…"), area);
        }
        LyricsView::Ready(lines) if lines.is_empty() => {
            frame.render_widget(placeholder("Instrumental"), area);
        }
        LyricsView::Ready(lines) => {
            let active = app.lyrics.cursor.active();
            let rendered: Vec<Line> = lines
                .iter()
                .enumerate()
                .map(|(i, l)| {
                    if Some(i) == active {
                        Line::from(l.text.as_str()).bold().fg(Color::Yellow)
                    } else {
                        Line::from(l.text.as_str()).dim()
                    }
                })
                .collect();
            let scroll = lyric_scroll(active, area.height.saturating_sub(2));
            let paragraph = Paragraph::new(rendered)
                .alignment(Alignment::Center)
                .scroll((scroll, 0))
                .block(block);
            frame.render_widget(paragraph, area);
        }
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    playback: &PlaybackState,
    display: &[usize],
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
    now: Instant,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app, playback, ui_settings, now))
        .block(Block::bordered().padding(LEFT_PAD).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    let selected_tab = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);
    let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.label()))
        .select(selected_tab)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(tabs, chunks[2]);

    let body = if app.show_lyrics {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[3])
    } else {
        Layout::default()
            .constraints([Constraint::Min(1)])
            .split(chunks[3])
    };
    draw_track_list(frame, body[0], app, playback, display);
    if app.show_lyrics {
        draw_lyrics(frame, body[1], app, playback);
    }

    let footer = Paragraph::new(controls_text(controls_settings.seek_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
