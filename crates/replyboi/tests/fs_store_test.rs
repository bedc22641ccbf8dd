use replyboi::model::{CounterState, DayKey};
use replyboi::store::fs_backend::FsStore;
use replyboi::store::StateStore;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsStore) {
    let dir = TempDir::new().unwrap();
    let store = FsStore::new(dir.path().join("data"));
    (dir, store)
}

fn day(d: u32) -> DayKey {
    DayKey::from_ymd(2024, 1, d).unwrap()
}

#[test]
fn test_missing_record_loads_as_none() {
    let (_dir, store) = setup();
    assert_eq!(store.load().unwrap(), None);
    assert!(!store.root().exists());
}

#[test]
fn test_save_then_load() {
    let (_dir, store) = setup();
    let mut state = CounterState::new(day(2));
    state.today_count = 3;

    store.save(&state).unwrap();

    assert_eq!(store.load().unwrap(), Some(state));
}

#[test]
fn test_on_disk_format() {
    let (_dir, store) = setup();
    let mut state = CounterState::new(day(1));
    state.today_count = 7;
    let (mut state, _) = state.roll_over(day(2));
    state.today_count = 3;

    store.save(&state).unwrap();

    let raw = fs::read_to_string(store.record_path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["today"], 3);
    assert_eq!(json["date"], "2024-01-02");
    assert_eq!(json["goal"], 20);
    assert_eq!(json["history"][0]["date"], "2024-01-01");
    assert_eq!(json["history"][0]["count"], 7);
    assert_eq!(json["history"][0]["goal"], 20);
}

#[test]
fn test_atomic_write_leaves_no_tmp_files() {
    let (_dir, store) = setup();
    let state = CounterState::new(day(1));

    for _ in 0..3 {
        store.save(&state).unwrap();
    }

    for entry in fs::read_dir(store.root()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_reads_legacy_bare_count() {
    let (_dir, store) = setup();
    fs::create_dir_all(store.root()).unwrap();
    fs::write(store.record_path(), "12").unwrap();

    let state = store.load().unwrap().unwrap();

    assert_eq!(state.today_count, 12);
    assert_eq!(state.current_day, None);
    assert_eq!(state.goal, 20);
    assert!(state.history.is_empty());
}

#[test]
fn test_out_of_range_goal_decodes_as_default() {
    let (_dir, store) = setup();
    fs::create_dir_all(store.root()).unwrap();
    fs::write(
        store.record_path(),
        r#"{"today": 2, "date": "2024-01-01", "history": [], "goal": 0}"#,
    )
    .unwrap();

    assert_eq!(store.load().unwrap().unwrap().goal, 20);
}

#[test]
fn test_corrupt_record_is_an_error() {
    let (_dir, store) = setup();
    fs::create_dir_all(store.root()).unwrap();
    fs::write(store.record_path(), "{not json").unwrap();

    assert!(store.load().is_err());
}

#[test]
fn test_lock_creates_lock_file_and_releases() {
    let (_dir, store) = setup();

    {
        let guard = store.lock().unwrap();
        assert!(guard.is_held());
        assert!(store.lock_path().exists());
    }

    // Released on drop, so it can be taken again.
    let again = store.lock().unwrap();
    assert!(again.is_held());
}
