//! Playback state types.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::catalog::Track;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop when the current song ends.
    Off,
    /// Wrap around to the start of the queue.
    #[default]
    All,
    /// Repeat the current song when it ends.
    One,
}

impl RepeatMode {
    /// `Off -> All -> One -> Off`.
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "Off",
            RepeatMode::All => "All",
            RepeatMode::One => "One",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Everything the UI shows about playback. Only the controller mutates it.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub current: Option<Track>,
    pub is_playing: bool,
    pub position: Duration,
    /// `None` until the transport reports it.
    pub duration: Option<Duration>,
    pub volume: f32,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub liked: BTreeSet<u64>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current: None,
            is_playing: false,
            position: Duration::ZERO,
            duration: None,
            volume: 1.0,
            shuffle: false,
            repeat: RepeatMode::default(),
            liked: BTreeSet::new(),
        }
    }
}

impl PlaybackState {
    pub fn current_id(&self) -> Option<u64> {
        self.current.as_ref().map(|t| t.id)
    }

    pub fn is_liked(&self, track_id: u64) -> bool {
        self.liked.contains(&track_id)
    }
}
