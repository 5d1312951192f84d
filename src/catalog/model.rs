use serde::Deserialize;

/// A catalog entry. Immutable once fetched.
///
/// The wire format uses the short field names `src` and `lrc`; the long
/// names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub id: u64,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub cover: String,
    #[serde(rename = "src", alias = "audioSource")]
    pub audio_source: String,
    #[serde(rename = "lrc", alias = "lyricSource", default)]
    pub lyric_source: Option<String>,
}

impl Track {
    /// `Artist - Title`, or just the title when the artist is blank.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", artist, self.title)
        }
    }

    /// Lyric document reference, treating a blank entry as absent.
    pub fn lyric_source(&self) -> Option<&str> {
        self.lyric_source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
