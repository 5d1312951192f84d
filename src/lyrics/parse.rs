use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

/// One timed line of a lyric document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricLine {
    pub timestamp: Duration,
    pub text: String,
}

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d{2}):(\d{2})(?:\.(\d{2,3}))?\]").expect("timestamp pattern is valid")
});

/// Parse a line-timed lyric document.
///
/// Only the first `[mm:ss]` / `[mm:ss.ff]` tag on a line is used; the rest of
/// the line, trimmed, is the text. Untimed lines and lines with no text are
/// dropped. Source order is kept as-is.
pub fn parse(document: &str) -> Vec<LyricLine> {
    document
        .lines()
        .filter_map(|line| {
            let caps = TIMESTAMP.captures(line)?;
            let whole = caps.get(0)?;

            let minutes: u64 = caps[1].parse().ok()?;
            let seconds: u64 = caps[2].parse().ok()?;
            let millis = caps.get(3).map_or(0, |m| fraction_millis(m.as_str()));

            let mut text = String::with_capacity(line.len());
            text.push_str(&line[..whole.start()]);
            text.push_str(&line[whole.end()..]);
            let text = text.trim();
            if text.is_empty() {
                return None;
            }

            Some(LyricLine {
                timestamp: Duration::from_millis((minutes * 60 + seconds) * 1000 + millis),
                text: text.to_string(),
            })
        })
        .collect()
}

/// "5" -> 500ms, "50" -> 500ms, "505" -> 505ms.
fn fraction_millis(digits: &str) -> u64 {
    let mut padded: String = digits.chars().take(3).collect();
    while padded.len() < 3 {
        padded.push('0');
    }
    padded.parse().unwrap_or(0)
}
