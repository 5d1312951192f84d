//! The playback controller: single owner of [`PlaybackState`].
//!
//! Every user command goes through here. The controller drives the
//! transport, applies transport events, and writes volume, liked tracks and
//! the last played track to the preference store as they change.

use std::collections::BTreeSet;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::catalog::Track;
use crate::prefs::{
    LAST_SONG_KEY, LIKED_KEY, PreferenceStore, Preferences, VOLUME_KEY, encode_liked,
};

use super::selector::{next_index, previous_index};
use super::state::{Direction, PlaybackState, RepeatMode};
use super::transport::{Transport, TransportEvent};

/// Startup knobs for a [`Controller`]. Stored preferences win over
/// `default_volume`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerOptions {
    /// "Previous" restarts the current track once playback is past this.
    pub restart_threshold: Duration,
    pub default_volume: f32,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            restart_threshold: Duration::from_secs(3),
            default_volume: 1.0,
            shuffle: false,
            repeat: RepeatMode::All,
        }
    }
}

pub struct Controller<T: Transport> {
    transport: T,
    prefs: Box<dyn PreferenceStore>,
    queue: Vec<Track>,
    state: PlaybackState,
    restart_threshold: Duration,
    /// Volume `toggle_mute` goes back to.
    unmuted_volume: f32,
    rng: StdRng,
}

impl<T: Transport> Controller<T> {
    /// Build a controller over `catalog`, hydrating volume, liked tracks and
    /// the last played track from `prefs`. The restored track is loaded into
    /// the transport but not played.
    pub fn new(
        mut transport: T,
        prefs: Box<dyn PreferenceStore>,
        catalog: &[Track],
        options: ControllerOptions,
    ) -> Self {
        let stored = Preferences::read(prefs.as_ref());

        let volume = stored
            .volume
            .unwrap_or(options.default_volume)
            .clamp(0.0, 1.0);
        let mut state = PlaybackState {
            volume,
            shuffle: options.shuffle,
            repeat: options.repeat,
            liked: stored.liked.unwrap_or_default(),
            ..PlaybackState::default()
        };
        transport.set_volume(volume);

        if let Some(id) = stored.last_song_id {
            match catalog.iter().find(|t| t.id == id) {
                Some(track) => {
                    info!(track_id = id, "restoring last played track");
                    transport.set_source(track);
                    state.current = Some(track.clone());
                }
                None => debug!(track_id = id, "last played track is no longer in the catalog"),
            }
        }

        Self {
            transport,
            prefs,
            queue: catalog.to_vec(),
            state,
            restart_threshold: options.restart_threshold,
            unmuted_volume: if volume > 0.0 { volume } else { 1.0 },
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the shuffle RNG, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Replace the queue used for next/previous. Playback is untouched, even
    /// when the current track is not part of the new queue.
    pub fn load_queue(&mut self, tracks: Vec<Track>) {
        debug!(len = tracks.len(), "queue replaced");
        self.queue = tracks;
    }

    /// Make `track` current and start it. Re-playing the current track
    /// resumes it instead of reloading.
    pub fn play(&mut self, track: &Track) {
        if self.state.current_id() != Some(track.id) {
            self.transport.set_source(track);
            self.state.current = Some(track.clone());
            self.state.position = Duration::ZERO;
            self.state.duration = None;
            self.persist(LAST_SONG_KEY, track.id.to_string());
        }
        self.start_transport();
    }

    fn start_transport(&mut self) {
        match self.transport.play() {
            Ok(()) => self.state.is_playing = true,
            Err(e) => {
                warn!(track_id = ?self.state.current_id(), error = %e, "playback rejected");
                self.state.is_playing = false;
            }
        }
    }

    /// Pause when playing, resume otherwise. No-op without a current track.
    pub fn toggle_playback(&mut self) {
        if self.state.current.is_none() {
            return;
        }
        if self.state.is_playing {
            self.transport.pause();
            self.state.is_playing = false;
        } else {
            self.start_transport();
        }
    }

    /// Pause and rewind to the start.
    pub fn stop(&mut self) {
        if self.state.current.is_none() {
            return;
        }
        self.transport.pause();
        self.state.is_playing = false;
        self.seek(Duration::ZERO);
    }

    /// Move through the queue. `Previous` restarts the current track instead
    /// when it has played past the restart threshold.
    pub fn advance(&mut self, direction: Direction) {
        if self.queue.is_empty() {
            debug!(?direction, "queue is empty");
            return;
        }

        if direction == Direction::Previous
            && self.state.current.is_some()
            && self.state.position > self.restart_threshold
        {
            self.seek(Duration::ZERO);
            return;
        }

        let current = self.state.current_id();
        let index = match direction {
            Direction::Next => next_index(&self.queue, current, self.state.shuffle, &mut self.rng),
            Direction::Previous => previous_index(&self.queue, current),
        };
        if let Some(i) = index {
            let track = self.queue[i].clone();
            self.play(&track);
        }
    }

    /// Seek within the current track, clamped to `[0, duration]`.
    ///
    /// The upper bound only applies once the transport has sent
    /// `MetadataReady`; before that the duration is unknown. A rejected seek
    /// leaves the transport on its old position, and so does the state.
    pub fn seek(&mut self, position: Duration) {
        if self.state.current.is_none() {
            return;
        }
        let position = match self.state.duration {
            Some(d) => position.min(d),
            None => position,
        };
        match self.transport.seek(position) {
            Ok(()) => self.state.position = position,
            Err(e) => warn!(?position, error = %e, "seek rejected"),
        }
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, delta_secs: f64) {
        let target = (self.state.position.as_secs_f64() + delta_secs).max(0.0);
        self.seek(Duration::from_secs_f64(target));
    }

    /// Set and persist the volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        if volume > 0.0 {
            self.unmuted_volume = volume;
        }
        self.transport.set_volume(volume);
        self.state.volume = volume;
        self.persist(VOLUME_KEY, volume.to_string());
    }

    pub fn change_volume(&mut self, delta: f32) {
        self.set_volume(self.state.volume + delta);
    }

    /// Silence, or restore the last audible volume.
    pub fn toggle_mute(&mut self) {
        if self.state.volume > 0.0 {
            self.set_volume(0.0);
        } else {
            self.set_volume(self.unmuted_volume);
        }
    }

    /// Add or remove `track_id` from the liked set. Returns whether it is
    /// liked afterwards.
    pub fn toggle_like(&mut self, track_id: u64) -> bool {
        let liked = if self.state.liked.remove(&track_id) {
            false
        } else {
            self.state.liked.insert(track_id);
            true
        };
        let encoded = encode_liked(&self.state.liked);
        self.persist(LIKED_KEY, encoded);
        liked
    }

    pub fn liked(&self) -> &BTreeSet<u64> {
        &self.state.liked
    }

    pub fn toggle_shuffle(&mut self) {
        self.state.shuffle = !self.state.shuffle;
    }

    pub fn cycle_repeat(&mut self) {
        self.state.repeat = self.state.repeat.cycle();
    }

    /// Drain and apply transport events.
    pub fn tick(&mut self) {
        for event in self.transport.poll() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Position(position) => self.state.position = position,
            TransportEvent::MetadataReady(duration) => self.state.duration = Some(duration),
            TransportEvent::Ended => self.on_track_ended(),
        }
    }

    fn on_track_ended(&mut self) {
        self.state.is_playing = false;
        match self.state.repeat {
            RepeatMode::One => {
                if let Err(e) = self.transport.seek(Duration::ZERO) {
                    warn!(error = %e, "rewind rejected");
                }
                self.state.position = Duration::ZERO;
                self.start_transport();
            }
            RepeatMode::All => self.advance(Direction::Next),
            RepeatMode::Off if self.state.shuffle => self.advance(Direction::Next),
            RepeatMode::Off => debug!("playback finished"),
        }
    }

    /// Stop output for good.
    pub fn shutdown(&mut self) {
        self.transport.release();
        self.state.is_playing = false;
    }

    fn persist(&mut self, key: &str, value: String) {
        if let Err(e) = self.prefs.set(key, value) {
            warn!(key, error = %e, "failed to persist preference");
        }
    }
}
