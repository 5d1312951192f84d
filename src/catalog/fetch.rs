//! Loading remote or local resources: the catalog itself, audio files and
//! lyric documents.
//!
//! Catalog entries usually carry site-relative references (`/songs/a.mp3`).
//! They resolve against a base location: a URL join for HTTP bases, a join
//! onto the base directory for local ones.

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};

use super::model::Track;

/// A resolved resource location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(Url),
    Local(PathBuf),
}

impl Location {
    /// Parse an absolute reference: an `http(s)://` URL, a `file://` URL or a path.
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        if is_remote(reference) {
            return Url::parse(reference)
                .map(Location::Remote)
                .map_err(|source| Error::Url {
                    location: reference.to_string(),
                    source,
                });
        }
        let path = reference.strip_prefix("file://").unwrap_or(reference);
        Ok(Location::Local(PathBuf::from(path)))
    }

    /// The location relative references are resolved against when this
    /// location is the catalog source: the URL itself, or the file's directory.
    fn as_base(&self) -> Location {
        match self {
            Location::Remote(url) => Location::Remote(url.clone()),
            Location::Local(path) => Location::Local(
                path.parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default(),
            ),
        }
    }
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

fn is_absolute(reference: &str) -> bool {
    is_remote(reference) || reference.starts_with("file://")
}

/// Blocking resource loader. Cheap to clone; clones share the HTTP client.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    base: Option<Location>,
}

impl Fetcher {
    /// Create a fetcher resolving relative references against `base`
    /// (a URL, or a directory path).
    pub fn new(base: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("encore/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base = base.map(Location::parse).transpose()?;
        Ok(Self { client, base })
    }

    /// Create a fetcher for a catalog at `source`. Without an explicit `base`,
    /// relative entries resolve against the catalog's own location.
    pub fn for_catalog(source: &str, base: Option<&str>) -> Result<Self> {
        let mut fetcher = Self::new(base)?;
        if fetcher.base.is_none() {
            fetcher.base = Some(Location::parse(source)?.as_base());
        }
        Ok(fetcher)
    }

    /// Resolve a catalog reference to a concrete location.
    pub fn resolve(&self, reference: &str) -> Result<Location> {
        let reference = reference.trim();
        if is_absolute(reference) {
            return Location::parse(reference);
        }

        match &self.base {
            Some(Location::Remote(base)) => {
                base.join(reference)
                    .map(Location::Remote)
                    .map_err(|source| Error::Url {
                        location: reference.to_string(),
                        source,
                    })
            }
            Some(Location::Local(dir)) => Ok(Location::Local(
                dir.join(reference.trim_start_matches('/')),
            )),
            None => Location::parse(reference),
        }
    }

    /// Fetch the raw bytes behind a catalog reference.
    pub fn fetch_bytes(&self, reference: &str) -> Result<Vec<u8>> {
        let location = self.resolve(reference)?;
        self.read(&location)
    }

    /// Fetch a text document behind a catalog reference.
    pub fn fetch_text(&self, reference: &str) -> Result<String> {
        let bytes = self.fetch_bytes(reference)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read a resolved location. Non-2xx responses are errors.
    pub fn read(&self, location: &Location) -> Result<Vec<u8>> {
        match location {
            Location::Remote(url) => {
                debug!(%url, "GET");
                let response = self.client.get(url.clone()).send()?.error_for_status()?;
                Ok(response.bytes()?.to_vec())
            }
            Location::Local(path) => {
                debug!(path = %path.display(), "read");
                Ok(fs::read(path)?)
            }
        }
    }
}

/// Fetch and decode the catalog at `source`.
pub fn fetch_catalog(fetcher: &Fetcher, source: &str) -> Result<Vec<Track>> {
    let location = Location::parse(source)?;
    let body = fetcher.read(&location)?;
    let tracks: Vec<Track> = serde_json::from_slice(&body)?;
    Ok(tracks)
}

/// Load the catalog, degrading to an empty library on any failure.
pub fn load_catalog(fetcher: &Fetcher, source: &str) -> Vec<Track> {
    match fetch_catalog(fetcher, source) {
        Ok(tracks) => {
            info!(count = tracks.len(), source, "catalog loaded");
            tracks
        }
        Err(e) => {
            warn!(source, error = %e, "catalog unavailable, starting with an empty library");
            Vec::new()
        }
    }
}
