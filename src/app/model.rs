//! Application model: what the list view shows and where the cursor is.
//!
//! Playback state lives in the controller; the model only holds view state
//! (tab, search, selection, lyrics pane, toast). The liked set is passed in
//! where the visible list depends on it.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::catalog::{Tab, Track, is_visible};
use crate::lyrics::{LoadedLyrics, LyricCursor, LyricLine};

/// What the lyrics pane currently holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LyricsView {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    /// Parsed lines; empty means the track has no (usable) lyrics.
    Ready(Vec<LyricLine>),
}

#[derive(Debug, Default)]
pub struct LyricsPane {
    pub track_id: Option<u64>,
    pub view: LyricsView,
    pub cursor: LyricCursor,
}

impl LyricsPane {
    pub fn lines(&self) -> &[LyricLine] {
        match &self.view {
            LyricsView::Ready(lines) => lines,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    shown_at: Instant,
}

/// The main application model.
pub struct App {
    pub catalog: Vec<Track>,
    /// Catalog index of the cursor.
    pub selected: usize,
    pub tab: Tab,

    pub filter_mode: bool,
    pub filter_query: String,

    pub follow_playback: bool,
    /// The visible list changed and the controller's queue must be replaced.
    pub queue_dirty: bool,

    pub show_lyrics: bool,
    pub lyrics: LyricsPane,

    toast: Option<Toast>,
    toast_ttl: Duration,
}

impl App {
    pub fn new(catalog: Vec<Track>, toast_ttl: Duration) -> Self {
        Self {
            catalog,
            selected: 0,
            tab: Tab::default(),
            filter_mode: false,
            filter_query: String::new(),
            follow_playback: true,
            queue_dirty: true,
            show_lyrics: true,
            lyrics: LyricsPane::default(),
            toast: None,
            toast_ttl,
        }
    }

    pub fn mark_queue_dirty(&mut self) {
        self.queue_dirty = true;
    }

    pub fn clear_queue_dirty(&mut self) {
        self.queue_dirty = false;
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Catalog indices visible under the current tab and search, in catalog order.
    pub fn display_indices(&self, liked: &BTreeSet<u64>) -> Vec<usize> {
        self.catalog
            .iter()
            .enumerate()
            .filter(|(_, t)| is_visible(t, &self.filter_query, self.tab, liked))
            .map(|(i, _)| i)
            .collect()
    }

    /// The visible list as a playback queue.
    pub fn visible_tracks(&self, liked: &BTreeSet<u64>) -> Vec<Track> {
        self.display_indices(liked)
            .into_iter()
            .map(|i| self.catalog[i].clone())
            .collect()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.catalog.get(self.selected)
    }

    /// Why the list is empty, if it is.
    pub fn empty_message(&self, liked: &BTreeSet<u64>) -> Option<&'static str> {
        if self.catalog.is_empty() {
            return Some("Library is empty.");
        }
        if !self.display_indices(liked).is_empty() {
            return None;
        }
        if self.tab == Tab::Favorites && self.filter_query.trim().is_empty() {
            Some("No favorite songs yet.")
        } else {
            Some("No songs match your search.")
        }
    }

    /// Next visible index after `current`, wrapping to the first.
    pub fn next_in_view_from(&self, current: usize, liked: &BTreeSet<u64>) -> Option<usize> {
        let display = self.display_indices(liked);
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Previous visible index before `current`, wrapping to the last.
    pub fn prev_in_view_from(&self, current: usize, liked: &BTreeSet<u64>) -> Option<usize> {
        let display = self.display_indices(liked);
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(0) | None => Some(display[display.len() - 1]),
            Some(p) => Some(display[p - 1]),
        }
    }

    pub fn next(&mut self, liked: &BTreeSet<u64>) {
        if let Some(next) = self.next_in_view_from(self.selected, liked) {
            self.selected = next;
        }
    }

    pub fn prev(&mut self, liked: &BTreeSet<u64>) {
        if let Some(prev) = self.prev_in_view_from(self.selected, liked) {
            self.selected = prev;
        }
    }

    pub fn select_first(&mut self, liked: &BTreeSet<u64>) {
        if let Some(&first) = self.display_indices(liked).first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self, liked: &BTreeSet<u64>) {
        if let Some(&last) = self.display_indices(liked).last() {
            self.selected = last;
        }
    }

    /// Move the cursor onto `track_id` if it is visible. Returns whether it moved there.
    pub fn select_track_id(&mut self, track_id: u64, liked: &BTreeSet<u64>) -> bool {
        let found = self
            .display_indices(liked)
            .into_iter()
            .find(|&i| self.catalog[i].id == track_id);
        match found {
            Some(i) => {
                self.selected = i;
                true
            }
            None => false,
        }
    }

    /// Keep the cursor on a visible row, falling back to the first one.
    pub fn ensure_selected_visible(&mut self, liked: &BTreeSet<u64>) {
        let display = self.display_indices(liked);
        if display.is_empty() {
            self.selected = 0;
            return;
        }

        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }

    pub fn next_tab(&mut self, liked: &BTreeSet<u64>) {
        self.tab = self.tab.next();
        self.mark_queue_dirty();
        self.ensure_selected_visible(liked);
    }

    /// The liked set changed; only the Favorites view depends on it.
    pub fn liked_changed(&mut self, liked: &BTreeSet<u64>) {
        if self.tab == Tab::Favorites {
            self.mark_queue_dirty();
            self.ensure_selected_visible(liked);
        }
    }

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.follow_playback_off();
    }

    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    pub fn clear_filter(&mut self, liked: &BTreeSet<u64>) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.mark_queue_dirty();
        self.ensure_selected_visible(liked);
    }

    pub fn push_filter_char(&mut self, c: char, liked: &BTreeSet<u64>) {
        self.filter_query.push(c);
        self.mark_queue_dirty();
        self.ensure_selected_visible(liked);
    }

    pub fn pop_filter_char(&mut self, liked: &BTreeSet<u64>) {
        self.filter_query.pop();
        self.mark_queue_dirty();
        self.ensure_selected_visible(liked);
    }

    pub fn toggle_lyrics(&mut self) {
        self.show_lyrics = !self.show_lyrics;
    }

    /// Clear the pane for `track_id` while its lyrics load.
    pub fn begin_lyrics(&mut self, track_id: u64) {
        self.lyrics.track_id = Some(track_id);
        self.lyrics.view = LyricsView::Loading;
        self.lyrics.cursor.reset();
    }

    /// Install loaded lyrics. Results for any other track than the pending
    /// one are stale and dropped.
    pub fn receive_lyrics(&mut self, loaded: LoadedLyrics) -> bool {
        if self.lyrics.track_id != Some(loaded.track_id) {
            return false;
        }
        self.lyrics.view = LyricsView::Ready(loaded.lines);
        self.lyrics.cursor.reset();
        true
    }

    /// Move the lyric highlight to `position`. Returns whether it changed.
    pub fn sync_lyrics(&mut self, position: Duration) -> bool {
        let LyricsView::Ready(lines) = &self.lyrics.view else {
            return false;
        };
        self.lyrics.cursor.update(lines, position)
    }

    pub fn show_toast(&mut self, message: impl Into<String>, now: Instant) {
        self.toast = Some(Toast {
            message: message.into(),
            shown_at: now,
        });
    }

    /// The toast still on screen at `now`, if any.
    pub fn active_toast(&self, now: Instant) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|t| now.duration_since(t.shown_at) < self.toast_ttl)
            .map(|t| t.message.as_str())
    }

    /// Drop an expired toast. Returns whether one was dropped.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self.toast.is_some() && self.active_toast(now).is_none() {
            self.toast = None;
            return true;
        }
        false
    }
}
