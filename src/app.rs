//! Application module: the view model the TUI renders and the runtime mutates.
//!
//! `App` lives in `app::model` and holds the catalog, the tab/search view
//! over it, the cursor, the lyrics pane and transient notices.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
