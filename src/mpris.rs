//! MPRIS (D-Bus) integration: desktop media keys, `playerctl` and the
//! desktop's now-playing widget.
//!
//! The service runs on its own thread. Remote calls are forwarded to the
//! runtime as [`ControlCmd`]s; the runtime pushes state back through an
//! [`MprisHandle`], which triggers `PropertiesChanged` signals.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, warn};
use zbus::object_server::InterfaceRef;
use zbus::{Connection, interface};
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::catalog::{Fetcher, Location, Track};
use crate::player::PlaybackState;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.encore";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

/// MPRIS playback status.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl Status {
    pub fn from_state(state: &PlaybackState) -> Self {
        match (&state.current, state.is_playing) {
            (None, _) => Status::Stopped,
            (Some(_), true) => Status::Playing,
            (Some(_), false) => Status::Paused,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Status::Stopped => "Stopped",
            Status::Playing => "Playing",
            Status::Paused => "Paused",
        }
    }
}

#[derive(Debug, Default)]
struct SharedState {
    status: Status,
    track_id: Option<OwnedObjectPath>,
    title: Option<String>,
    artist: Vec<String>,
    url: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
    fetcher: Option<Fetcher>,
}

impl MprisHandle {
    pub fn set_status(&self, status: Status) {
        if let Ok(mut s) = self.state.lock() {
            if s.status == status {
                return;
            }
            s.status = status;
        }
        let _ = self.notify.send(());
    }

    /// Publish metadata for `track`, or clear it.
    pub fn set_track_metadata(&self, track: Option<&Track>, length: Option<Duration>) {
        if let Ok(mut s) = self.state.lock() {
            match track {
                Some(track) => {
                    s.track_id = track_object_path(track.id);
                    s.title = Some(track.title.clone());
                    s.artist = if track.artist.trim().is_empty() {
                        Vec::new()
                    } else {
                        vec![track.artist.clone()]
                    };
                    s.url = Some(self.absolute_url(&track.audio_source));
                    s.art_url = (!track.cover.trim().is_empty())
                        .then(|| self.absolute_url(&track.cover));
                    s.length_micros = length.map(|d| d.as_micros().min(i64::MAX as u128) as i64);
                }
                None => *s = SharedState {
                    status: s.status,
                    ..SharedState::default()
                },
            }
        }
        let _ = self.notify.send(());
    }

    /// Resolve a catalog reference so desktop widgets can open it directly.
    fn absolute_url(&self, reference: &str) -> String {
        let resolved = self.fetcher.as_ref().and_then(|f| f.resolve(reference).ok());
        match resolved {
            Some(Location::Remote(url)) => url.to_string(),
            Some(Location::Local(path)) => format!("file://{}", path.display()),
            None => reference.to_string(),
        }
    }
}

fn track_object_path(track_id: u64) -> Option<OwnedObjectPath> {
    OwnedObjectPath::try_from(format!("{OBJECT_PATH}/track/{track_id}")).ok()
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "encore"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["http".to_string(), "https".to_string(), "file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        self.state
            .lock()
            .map(|s| s.status.as_str())
            .unwrap_or("Stopped")
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };

        if let Some(path) = &s.track_id {
            put("mpris:trackid", Value::from(path.clone().into_inner()));
        }
        if let Some(title) = &s.title {
            put("xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            put("xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(url) = &s.url {
            put("xesam:url", Value::from(url.clone()));
        }
        if let Some(art) = &s.art_url {
            put("mpris:artUrl", Value::from(art.clone()));
        }
        if let Some(len) = s.length_micros {
            put("mpris:length", Value::from(len));
        }
        map
    }
}

/// Start the MPRIS service. `fetcher` resolves relative catalog references
/// into the absolute URLs MPRIS clients expect.
pub fn spawn_mpris(tx: Sender<ControlCmd>, fetcher: Option<Fetcher>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(serve(tx, state_for_thread, notify_rx));
    });

    MprisHandle {
        state,
        notify: notify_tx,
        fetcher,
    }
}

async fn serve(tx: Sender<ControlCmd>, state: Arc<Mutex<SharedState>>, notify: Receiver<()>) {
    let connection = match Connection::session().await {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "MPRIS: failed to connect to session bus");
            return;
        }
    };

    if let Err(e) = connection.request_name(BUS_NAME).await {
        warn!(error = %e, "MPRIS: failed to acquire name");
        return;
    }

    let object_server = connection.object_server();

    if let Err(e) = object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await
    {
        warn!(error = %e, "MPRIS: failed to register root iface");
        return;
    }

    if let Err(e) = object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await
    {
        warn!(error = %e, "MPRIS: failed to register player iface");
        return;
    }

    let player: InterfaceRef<PlayerIface> = match object_server.interface(OBJECT_PATH).await {
        Ok(iface) => iface,
        Err(e) => {
            warn!(error = %e, "MPRIS: player iface vanished");
            return;
        }
    };
    debug!("MPRIS: serving {BUS_NAME}");

    // Coalesce change notifications and emit PropertiesChanged.
    loop {
        let mut changed = false;
        loop {
            match notify.try_recv() {
                Ok(()) => changed = true,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        if changed {
            let emitter = player.signal_emitter();
            let iface = player.get().await;
            if let Err(e) = iface.playback_status_changed(emitter).await {
                debug!(error = %e, "MPRIS: failed to signal status change");
            }
            if let Err(e) = iface.metadata_changed(emitter).await {
                debug!(error = %e, "MPRIS: failed to signal metadata change");
            }
        }

        Timer::after(Duration::from_millis(200)).await;
    }
}

#[cfg(test)]
mod tests;
