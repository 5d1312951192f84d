//! Crate-wide error type.
//!
//! Most of these never reach the user: the controller and the loaders turn
//! them into a log line and an empty or paused state.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid location {location}: {source}")]
    Url {
        location: String,
        #[source]
        source: url::ParseError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no audio output available: {0}")]
    Stream(#[from] rodio::StreamError),

    #[error("cannot decode audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("no audio source assigned")]
    NoSource,
}

pub type Result<T> = std::result::Result<T, Error>;
