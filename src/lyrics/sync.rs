use std::time::Duration;

use super::parse::LyricLine;

/// Index of the last line whose timestamp is at or before `position`.
///
/// Lines are scanned in source order, so for unsorted documents this is the
/// highest index that has started, not necessarily the latest timestamp.
pub fn active_line_index(lines: &[LyricLine], position: Duration) -> Option<usize> {
    lines.iter().rposition(|line| line.timestamp <= position)
}

/// Remembers the active line and reports when it changes, so the view only
/// re-centers on real transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricCursor {
    active: Option<usize>,
}

impl LyricCursor {
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Recompute the active line; returns `true` when it changed.
    pub fn update(&mut self, lines: &[LyricLine], position: Duration) -> bool {
        let next = active_line_index(lines, position);
        if next == self.active {
            return false;
        }
        self.active = next;
        true
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}
