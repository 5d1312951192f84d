//! `Transport` backed by a rodio `Sink` on the default output device.
//!
//! Sources are fetched and decoded lazily on `play`, so assigning a source
//! never fails; a broken file surfaces as a rejected `play`. The fetched
//! bytes are kept for the lifetime of the source, and seeks rebuild the sink
//! from them (`Sink::try_seek` waits on the output thread).

use std::io::Cursor;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use crate::catalog::{Fetcher, Track};
use crate::error::{Error, Result};

use super::transport::{Transport, TransportEvent};

type AudioBytes = Arc<[u8]>;
type AudioDecoder = Decoder<Cursor<AudioBytes>>;

/// Decode in-memory audio. Without the byte length rodio reports no
/// duration for MP3 and refuses to seek backwards.
fn decode(bytes: AudioBytes) -> Result<AudioDecoder> {
    let byte_len = bytes.len() as u64;
    let decoder = Decoder::builder()
        .with_data(Cursor::new(bytes))
        .with_byte_len(byte_len)
        .build()?;
    Ok(decoder)
}

pub struct RodioTransport {
    /// Keeps the device open; `None` when driving a detached mixer.
    _stream: Option<OutputStream>,
    mixer: Mixer,
    fetcher: Fetcher,
    source: Option<String>,
    /// Fetched audio of `source`.
    bytes: Option<AudioBytes>,
    sink: Option<Sink>,
    volume: f32,
    duration: Option<Duration>,
    duration_reported: bool,
    /// Where the next `play` starts when nothing is loaded.
    pending_seek: Duration,
    /// Start position of the loaded sink; `Sink::get_pos` counts from it.
    offset: Duration,
    playing: bool,
    fade_out: Duration,
}

impl RodioTransport {
    /// Open the default output device.
    pub fn open(fetcher: Fetcher, fade_out: Duration) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when the stream is dropped, which would land on the TUI.
        stream.log_on_drop(false);
        let mixer = stream.mixer().clone();

        Ok(Self::new(Some(stream), mixer, fetcher, fade_out))
    }

    fn new(stream: Option<OutputStream>, mixer: Mixer, fetcher: Fetcher, fade_out: Duration) -> Self {
        Self {
            _stream: stream,
            mixer,
            fetcher,
            source: None,
            bytes: None,
            sink: None,
            volume: 1.0,
            duration: None,
            duration_reported: false,
            pending_seek: Duration::ZERO,
            offset: Duration::ZERO,
            playing: false,
            fade_out,
        }
    }

    /// The current source's audio, fetched on first use.
    fn source_bytes(&mut self) -> Result<AudioBytes> {
        if let Some(bytes) = &self.bytes {
            return Ok(Arc::clone(bytes));
        }
        let Some(reference) = self.source.as_deref() else {
            return Err(Error::NoSource);
        };
        let bytes: AudioBytes = self.fetcher.fetch_bytes(reference)?.into();
        debug!(source = reference, len = bytes.len(), "source fetched");
        self.bytes = Some(Arc::clone(&bytes));
        Ok(bytes)
    }

    /// Replace the loaded sink with a paused one starting at `start_at`.
    /// On error the previous sink is left untouched.
    fn load(&mut self, start_at: Duration) -> Result<()> {
        let mut decoder = decode(self.source_bytes()?)?;
        let duration = decoder.total_duration();

        let sink = Sink::connect_new(&self.mixer);
        sink.set_volume(self.volume);
        if start_at.is_zero() {
            sink.append(decoder);
        } else {
            match decoder.try_seek(start_at) {
                Ok(()) => sink.append(decoder),
                Err(e) => {
                    debug!(error = %e, "decoder seek unsupported, skipping instead");
                    sink.append(decoder.skip_duration(start_at));
                }
            }
        }
        sink.pause();

        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        if self.duration != duration {
            self.duration = duration;
            self.duration_reported = false;
        }
        debug!(start_at = ?start_at, duration = ?self.duration, "source loaded");
        self.offset = start_at;
        Ok(())
    }

    fn fade_out_sink(sink: &Sink, fade_out: Duration, from: f32) {
        let fade_out_ms = fade_out.as_millis() as u64;
        if fade_out_ms == 0 {
            sink.set_volume(0.0);
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            sink.set_volume(from * (1.0 - t));
            thread::sleep(Duration::from_millis(step_ms));
        }
        sink.set_volume(0.0);
    }
}

impl Transport for RodioTransport {
    fn set_source(&mut self, track: &Track) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.source = Some(track.audio_source.clone());
        self.bytes = None;
        self.duration = None;
        self.duration_reported = false;
        self.pending_seek = Duration::ZERO;
        self.offset = Duration::ZERO;
        self.playing = false;
    }

    fn play(&mut self) -> Result<()> {
        let needs_load = self.sink.as_ref().is_none_or(Sink::empty);
        if needs_load {
            let start_at = std::mem::take(&mut self.pending_seek);
            if let Err(e) = self.load(start_at) {
                self.playing = false;
                return Err(e);
            }
        }
        if let Some(sink) = &self.sink {
            sink.play();
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let live = self.sink.as_ref().is_some_and(|s| !s.empty());
        if !live {
            // Nothing loaded (or already finished): start there on the next play.
            self.pending_seek = position;
            return Ok(());
        }

        self.load(position)?;
        if self.playing {
            if let Some(sink) = &self.sink {
                sink.play();
            }
        }
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        let mut events = Vec::new();
        let Some(sink) = self.sink.as_ref() else {
            return events;
        };

        if !self.duration_reported {
            if let Some(d) = self.duration {
                events.push(TransportEvent::MetadataReady(d));
            }
            self.duration_reported = true;
        }

        if self.playing {
            if sink.empty() {
                self.playing = false;
                events.push(TransportEvent::Ended);
            } else {
                events.push(TransportEvent::Position(self.offset + sink.get_pos()));
            }
        }
        events
    }

    fn release(&mut self) {
        if let Some(sink) = self.sink.take() {
            if self.playing {
                Self::fade_out_sink(&sink, self.fade_out, self.volume);
            }
            sink.stop();
        }
        self.source = None;
        self.bytes = None;
        self.playing = false;
    }
}
