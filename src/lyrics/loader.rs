use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use crate::catalog::{Fetcher, Track};

use super::parse::{LyricLine, parse};

/// Lyrics delivered for a track. An empty list means "instrumental".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedLyrics {
    pub track_id: u64,
    pub lines: Vec<LyricLine>,
}

/// Fetches lyric documents on helper threads and hands results back over a channel.
///
/// Results arrive in completion order; callers drop the ones for tracks that
/// are no longer current.
pub struct LyricLoader {
    fetcher: Fetcher,
    tx: Sender<LoadedLyrics>,
    rx: Receiver<LoadedLyrics>,
}

impl LyricLoader {
    pub fn new(fetcher: Fetcher) -> Self {
        let (tx, rx) = mpsc::channel::<LoadedLyrics>();
        Self { fetcher, tx, rx }
    }

    /// Start loading lyrics for `track`.
    pub fn request(&self, track: &Track) {
        let track_id = track.id;
        let Some(reference) = track.lyric_source().map(str::to_string) else {
            let _ = self.tx.send(LoadedLyrics {
                track_id,
                lines: Vec::new(),
            });
            return;
        };

        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let lines = match fetcher.fetch_text(&reference) {
                Ok(document) => parse(&document),
                Err(e) => {
                    warn!(track_id, error = %e, "lyrics unavailable");
                    Vec::new()
                }
            };
            debug!(track_id, lines = lines.len(), "lyrics loaded");
            let _ = tx.send(LoadedLyrics { track_id, lines });
        });
    }

    /// Next finished load, if any.
    pub fn try_recv(&self) -> Option<LoadedLyrics> {
        self.rx.try_recv().ok()
    }
}
