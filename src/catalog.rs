//! Song catalog: the track model, the resource fetcher shared with the audio
//! transport and the lyric loader, and the tab/search filter that decides
//! which tracks are visible (and therefore queued).

mod fetch;
mod filter;
mod model;

pub use fetch::{Fetcher, Location, fetch_catalog, load_catalog};
pub use filter::{Tab, is_visible, matches_search};
pub use model::Track;
