use std::collections::BTreeSet;

use super::model::Track;

/// Library tabs. The active tab plus the search query define the queue.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    AllSongs,
    Favorites,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::AllSongs, Tab::Favorites];

    pub fn label(self) -> &'static str {
        match self {
            Tab::AllSongs => "All Songs",
            Tab::Favorites => "Favorites",
        }
    }

    /// The tab to the right, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Tab::AllSongs => Tab::Favorites,
            Tab::Favorites => Tab::AllSongs,
        }
    }
}

/// Case-insensitive substring match on title or artist. A blank query matches everything.
pub fn matches_search(track: &Track, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    track.title.to_lowercase().contains(&query) || track.artist.to_lowercase().contains(&query)
}

/// Whether `track` shows up under `tab` with the given search `query`.
pub fn is_visible(track: &Track, query: &str, tab: Tab, liked: &BTreeSet<u64>) -> bool {
    let in_tab = match tab {
        Tab::AllSongs => true,
        Tab::Favorites => liked.contains(&track.id),
    };
    in_tab && matches_search(track, query)
}
