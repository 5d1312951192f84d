use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use super::*;
use crate::catalog::{Tab, Track};
use crate::lyrics::{LoadedLyrics, parse};

fn t(id: u64, title: &str, artist: &str) -> Track {
    Track {
        id,
        title: title.into(),
        artist: artist.into(),
        cover: String::new(),
        audio_source: format!("/songs/{id}.mp3"),
        lyric_source: None,
    }
}

fn app() -> App {
    App::new(
        vec![
            t(1, "Alpha", "Nadia"),
            t(2, "Beta", "The Tides"),
            t(3, "Gamma", "Nadia"),
            t(4, "Delta", "Orbit"),
        ],
        Duration::from_secs(2),
    )
}

fn liked(ids: &[u64]) -> BTreeSet<u64> {
    ids.iter().copied().collect()
}

#[test]
fn display_indices_follow_search_in_catalog_order() {
    let mut app = app();
    let none = liked(&[]);
    assert_eq!(app.display_indices(&none), vec![0, 1, 2, 3]);

    app.filter_query = "nadia".into();
    assert_eq!(app.display_indices(&none), vec![0, 2]);

    app.filter_query = "ELTA".into();
    assert_eq!(app.display_indices(&none), vec![3]);
}

#[test]
fn favorites_tab_shows_only_liked_tracks() {
    let mut app = app();
    let fav = liked(&[4, 2]);
    app.next_tab(&fav);
    assert_eq!(app.tab, Tab::Favorites);
    assert_eq!(app.display_indices(&fav), vec![1, 3]);
    assert_eq!(app.selected, 1);

    let ids: Vec<u64> = app.visible_tracks(&fav).iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 4]);
}

#[test]
fn empty_messages_explain_why_nothing_is_listed() {
    let mut app = app();
    assert_eq!(app.empty_message(&liked(&[])), None);

    app.next_tab(&liked(&[]));
    assert_eq!(app.empty_message(&liked(&[])), Some("No favorite songs yet."));

    app.filter_query = "zzz".into();
    assert_eq!(
        app.empty_message(&liked(&[1])),
        Some("No songs match your search.")
    );

    let empty = App::new(Vec::new(), Duration::from_secs(2));
    assert_eq!(empty.empty_message(&liked(&[])), Some("Library is empty."));
}

#[test]
fn next_prev_in_view_wrap_over_visible_rows() {
    let mut app = app();
    let none = liked(&[]);
    app.filter_query = "nadia".into();

    assert_eq!(app.next_in_view_from(0, &none), Some(2));
    assert_eq!(app.next_in_view_from(2, &none), Some(0));
    assert_eq!(app.prev_in_view_from(0, &none), Some(2));
    // A hidden cursor jumps into view.
    assert_eq!(app.next_in_view_from(1, &none), Some(0));
    assert_eq!(app.prev_in_view_from(1, &none), Some(2));

    app.filter_query = "nothing".into();
    assert_eq!(app.next_in_view_from(0, &none), None);
}

#[test]
fn cursor_moves_and_jumps() {
    let mut app = app();
    let none = liked(&[]);
    app.next(&none);
    assert_eq!(app.selected, 1);
    app.prev(&none);
    app.prev(&none);
    assert_eq!(app.selected, 3);
    app.select_first(&none);
    assert_eq!(app.selected, 0);
    app.select_last(&none);
    assert_eq!(app.selected, 3);
}

#[test]
fn select_track_id_only_lands_on_visible_rows() {
    let mut app = app();
    let none = liked(&[]);
    assert!(app.select_track_id(3, &none));
    assert_eq!(app.selected, 2);

    app.filter_query = "beta".into();
    assert!(!app.select_track_id(3, &none));
    assert_eq!(app.selected, 2);
}

#[test]
fn filter_edits_mark_queue_dirty_and_keep_cursor_visible() {
    let mut app = app();
    let none = liked(&[]);
    assert!(app.queue_dirty);
    app.clear_queue_dirty();

    app.enter_filter_mode();
    assert!(app.filter_mode);
    assert!(!app.follow_playback);

    for c in "tides".chars() {
        app.push_filter_char(c, &none);
    }
    assert!(app.queue_dirty);
    assert_eq!(app.selected, 1);

    app.clear_queue_dirty();
    app.pop_filter_char(&none);
    assert!(app.queue_dirty);

    app.clear_filter(&none);
    assert!(app.filter_query.is_empty());
    assert!(!app.filter_mode);
}

#[test]
fn unliking_in_favorites_refreshes_queue() {
    let mut app = app();
    let mut fav = liked(&[1, 3]);
    app.next_tab(&fav);
    app.clear_queue_dirty();
    app.selected = 2;

    fav.remove(&3);
    app.liked_changed(&fav);
    assert!(app.queue_dirty);
    assert_eq!(app.selected, 0);

    app.next_tab(&fav);
    app.clear_queue_dirty();
    app.liked_changed(&fav);
    assert!(!app.queue_dirty);
}

#[test]
fn toast_expires_after_ttl() {
    let mut app = app();
    let now = Instant::now();
    app.show_toast("Added to Favorites", now);

    assert_eq!(app.active_toast(now), Some("Added to Favorites"));
    assert_eq!(
        app.active_toast(now + Duration::from_millis(1999)),
        Some("Added to Favorites")
    );
    assert!(!app.expire_toast(now + Duration::from_millis(500)));
    assert!(app.expire_toast(now + Duration::from_secs(2)));
    assert_eq!(app.active_toast(now), None);
}

#[test]
fn lyrics_pane_ignores_stale_results() {
    let mut app = app();
    app.begin_lyrics(1);
    assert_eq!(app.lyrics.view, LyricsView::Loading);

    app.begin_lyrics(2);
    let stale = LoadedLyrics {
        track_id: 1,
        lines: parse("[00:01]old"),
    };
    assert!(!app.receive_lyrics(stale));
    assert_eq!(app.lyrics.view, LyricsView::Loading);

    let fresh = LoadedLyrics {
        track_id: 2,
        lines: parse("[00:01]one\n[00:03]two"),
    };
    assert!(app.receive_lyrics(fresh));
    assert_eq!(app.lyrics.lines().len(), 2);

    assert!(!app.sync_lyrics(Duration::from_millis(500)));
    assert!(app.sync_lyrics(Duration::from_secs(1)));
    assert_eq!(app.lyrics.cursor.active(), Some(0));
    assert!(app.sync_lyrics(Duration::from_secs(4)));
    assert_eq!(app.lyrics.cursor.active(), Some(1));

    app.begin_lyrics(3);
    assert_eq!(app.lyrics.cursor.active(), None);
    assert!(app.lyrics.lines().is_empty());
}
