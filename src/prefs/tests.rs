use std::collections::BTreeSet;
use std::fs;

use tempfile::tempdir;

use super::*;

#[test]
fn read_parses_all_keys() {
    let mut store = MemoryStore::default();
    store.set(VOLUME_KEY, "0.35".into()).unwrap();
    store.set(LIKED_KEY, "[3, 1, 3]".into()).unwrap();
    store.set(LAST_SONG_KEY, "7".into()).unwrap();

    let prefs = Preferences::read(&store);
    assert_eq!(prefs.volume, Some(0.35));
    assert_eq!(prefs.liked, Some([1u64, 3].into_iter().collect()));
    assert_eq!(prefs.last_song_id, Some(7));
}

#[test]
fn read_ignores_corrupt_values() {
    let mut store = MemoryStore::default();
    store.set(VOLUME_KEY, "loud".into()).unwrap();
    store.set(LIKED_KEY, "[1, 2".into()).unwrap();
    store.set(LAST_SONG_KEY, "seven".into()).unwrap();

    assert_eq!(Preferences::read(&store), Preferences::default());
}

#[test]
fn read_clamps_stored_volume() {
    let mut store = MemoryStore::default();
    store.set(VOLUME_KEY, "3".into()).unwrap();
    assert_eq!(Preferences::read(&store).volume, Some(1.0));
}

#[test]
fn encode_liked_writes_a_json_array() {
    let liked: BTreeSet<u64> = [5, 2].into_iter().collect();
    assert_eq!(encode_liked(&liked), "[2,5]");
    assert_eq!(encode_liked(&BTreeSet::new()), "[]");
}

#[test]
fn memory_store_clones_share_entries() {
    let store = MemoryStore::default();
    let mut writer = store.clone();
    writer.set("k", "v".into()).unwrap();
    assert_eq!(store.get("k").as_deref(), Some("v"));
}

#[test]
fn json_file_store_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("prefs.json");

    let mut store = JsonFileStore::open(&path);
    assert_eq!(store.get(VOLUME_KEY), None);
    store.set(VOLUME_KEY, "0.5".into()).unwrap();
    store.set(LAST_SONG_KEY, "2".into()).unwrap();

    let reopened = JsonFileStore::open(&path);
    assert_eq!(reopened.get(VOLUME_KEY).as_deref(), Some("0.5"));
    assert_eq!(reopened.get(LAST_SONG_KEY).as_deref(), Some("2"));
}

#[test]
fn json_file_store_starts_empty_when_file_is_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    fs::write(&path, "not json").unwrap();

    let mut store = JsonFileStore::open(&path);
    assert_eq!(store.get(VOLUME_KEY), None);

    // The next write replaces the corrupt file.
    store.set(VOLUME_KEY, "1".into()).unwrap();
    assert_eq!(JsonFileStore::open(&path).get(VOLUME_KEY).as_deref(), Some("1"));
}
