use super::*;
use std::fs;
use std::sync::mpsc;
use std::time::Duration;

use tempfile::tempdir;

fn make_track() -> Track {
    Track {
        id: 7,
        title: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
        cover: "/covers/7.jpg".to_string(),
        audio_source: "/songs/7.mp3".to_string(),
        lyric_source: None,
    }
}

fn make_handle(fetcher: Option<Fetcher>) -> (MprisHandle, Arc<Mutex<SharedState>>, Receiver<()>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();
    let handle = MprisHandle {
        state: state.clone(),
        notify: notify_tx,
        fetcher,
    };
    (handle, state, notify_rx)
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let fetcher = Fetcher::for_catalog("http://localhost:3000/api/songs", None).unwrap();
    let (handle, state, notify) = make_handle(Some(fetcher));

    let track = make_track();
    handle.set_track_metadata(Some(&track), Some(Duration::from_micros(1_234_567)));
    assert!(notify.try_recv().is_ok());

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.url.as_deref(), Some("http://localhost:3000/songs/7.mp3"));
        assert_eq!(s.art_url.as_deref(), Some("http://localhost:3000/covers/7.jpg"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_status(Status::Playing);
    handle.set_track_metadata(None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.url, None);
        assert_eq!(s.art_url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
        assert_eq!(s.status, Status::Playing);
    }
}

#[test]
fn local_references_become_file_urls() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("songs.json");
    fs::write(&catalog, "[]").unwrap();
    let fetcher = Fetcher::for_catalog(catalog.to_str().unwrap(), None).unwrap();
    let (handle, state, _notify) = make_handle(Some(fetcher));

    let mut track = make_track();
    track.cover = String::new();
    handle.set_track_metadata(Some(&track), None);

    let s = state.lock().unwrap();
    let expected = format!("file://{}", dir.path().join("songs/7.mp3").display());
    assert_eq!(s.url.as_deref(), Some(expected.as_str()));
    assert_eq!(s.art_url, None);
}

#[test]
fn unchanged_status_does_not_notify() {
    let (handle, _state, notify) = make_handle(None);
    handle.set_status(Status::Stopped);
    assert!(notify.try_recv().is_err());
    handle.set_status(Status::Paused);
    assert!(notify.try_recv().is_ok());
}

#[test]
fn status_derives_from_playback_state() {
    let mut state = PlaybackState::default();
    assert_eq!(Status::from_state(&state), Status::Stopped);

    state.current = Some(make_track());
    assert_eq!(Status::from_state(&state), Status::Paused);

    state.is_playing = true;
    assert_eq!(Status::from_state(&state), Status::Playing);
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    assert_eq!(iface.playback_status(), "Stopped");

    state.lock().unwrap().status = Status::Playing;
    assert_eq!(iface.playback_status(), "Playing");

    state.lock().unwrap().status = Status::Paused;
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn player_methods_forward_control_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.play_pause();
    iface.next();
    iface.previous();
    iface.stop();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::Stop
        ]
    );
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (handle, state, _notify) = make_handle(None);
    handle.set_track_metadata(Some(&make_track()), Some(Duration::from_secs(1)));

    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:url",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}
