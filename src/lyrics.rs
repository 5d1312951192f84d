//! Line-timed lyrics: parsing `[mm:ss.ff]` documents, mapping a playback
//! position to the active line, and loading documents off the UI thread.

mod loader;
mod parse;
mod sync;

pub use loader::{LoadedLyrics, LyricLoader};
pub use parse::{LyricLine, parse};
pub use sync::{LyricCursor, active_line_index};
