//! Persisted user preferences: volume, liked tracks and the last played track.
//!
//! The store is a flat string map. Values are read best-effort at startup:
//! anything that fails to parse is logged and ignored so the in-memory
//! defaults stay in place.

use std::collections::BTreeSet;

use tracing::warn;

mod store;

pub use store::{JsonFileStore, MemoryStore, PreferenceStore};

pub const VOLUME_KEY: &str = "volume";
pub const LIKED_KEY: &str = "likedSongs";
pub const LAST_SONG_KEY: &str = "lastSongId";

/// Values hydrated from a [`PreferenceStore`]. `None` means "absent or unreadable".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    pub volume: Option<f32>,
    pub liked: Option<BTreeSet<u64>>,
    pub last_song_id: Option<u64>,
}

impl Preferences {
    pub fn read(store: &dyn PreferenceStore) -> Self {
        let volume = store.get(VOLUME_KEY).and_then(|raw| {
            match raw.trim().parse::<f32>() {
                Ok(v) if v.is_finite() => Some(v.clamp(0.0, 1.0)),
                _ => {
                    warn!(key = VOLUME_KEY, value = %raw, "ignoring unreadable preference");
                    None
                }
            }
        });

        let liked = store.get(LIKED_KEY).and_then(|raw| {
            match serde_json::from_str::<Vec<u64>>(&raw) {
                Ok(ids) => Some(ids.into_iter().collect()),
                Err(e) => {
                    warn!(key = LIKED_KEY, error = %e, "ignoring unreadable preference");
                    None
                }
            }
        });

        let last_song_id = store.get(LAST_SONG_KEY).and_then(|raw| {
            match raw.trim().parse::<u64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(key = LAST_SONG_KEY, value = %raw, "ignoring unreadable preference");
                    None
                }
            }
        });

        Self {
            volume,
            liked,
            last_song_id,
        }
    }
}

/// Encode the liked set the way it is stored: a JSON array of integers.
pub fn encode_liked(liked: &BTreeSet<u64>) -> String {
    let ids: Vec<u64> = liked.iter().copied().collect();
    serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests;
