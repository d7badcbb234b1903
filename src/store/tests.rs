use super::*;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn roster(models: &[&str]) -> Vec<String> {
    models.iter().map(|m| m.to_string()).collect()
}

fn store_in(dir: &TempDir, mode: LockMode) -> RatingStore {
    RatingStore::new(
        dir.path().join("elo_state.json"),
        roster(&["model-a", "model-b"]),
        mode,
    )
}

#[test]
fn test_fresh_store_backfills_roster() {
    let dir = TempDir::new().expect("tempdir");
    let store = store_in(&dir, LockMode::Process);

    let state = store.read().expect("read");
    assert_eq!(state.ratings["model-a"], INITIAL_RATING);
    assert_eq!(state.ratings["model-b"], INITIAL_RATING);
    assert_eq!(state.votes["model-a"], 0);
    assert_eq!(state.total_votes, 0);
}

#[test]
fn test_update_persists_and_round_trips() {
    let dir = TempDir::new().expect("tempdir");
    let store = store_in(&dir, LockMode::File);

    let (state, delta) = store
        .update(|state| {
            *state.ratings.get_mut("model-a").expect("backfilled") = 1516.25;
            *state.votes.get_mut("model-a").expect("backfilled") = 1;
            state.total_votes += 1;
            42u32
        })
        .expect("update");

    assert_eq!(delta, 42);
    assert_eq!(state.ratings["model-a"], 1516.25);

    // A second store over the same file sees exactly what was persisted.
    let reopened = store_in(&dir, LockMode::File);
    let reloaded = reopened.read().expect("read");
    assert_eq!(reloaded, state);
}

#[test]
fn test_legacy_bare_map_document_migrates() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("elo_state.json");
    std::fs::write(&path, r#"{"model-a": 1620.5, "model-c": 1410.0}"#).unwrap();

    let store = RatingStore::new(path, roster(&["model-a", "model-b"]), LockMode::Process);
    let state = store.read().expect("read");

    // Legacy ratings survive, votes/total default, roster backfill applies.
    assert_eq!(state.ratings["model-a"], 1620.5);
    assert_eq!(state.ratings["model-c"], 1410.0);
    assert_eq!(state.ratings["model-b"], INITIAL_RATING);
    assert_eq!(state.votes["model-a"], 0);
    assert_eq!(state.total_votes, 0);
}

#[test]
fn test_current_document_without_total_votes_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("elo_state.json");
    std::fs::write(&path, r#"{"ratings": {"model-a": 1555.0}}"#).unwrap();

    let store = RatingStore::new(path, roster(&["model-a"]), LockMode::Process);
    let state = store.read().expect("read");

    assert_eq!(state.ratings["model-a"], 1555.0);
    assert_eq!(state.total_votes, 0);
}

#[test]
fn test_malformed_document_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("elo_state.json");
    std::fs::write(&path, "{broken").unwrap();

    let store = RatingStore::new(path, roster(&["model-a"]), LockMode::Process);
    assert!(matches!(store.read(), Err(StoreError::Malformed { .. })));
}

#[test]
fn test_backfill_preserves_existing_entries() {
    let mut state = RatingState::default();
    state.ratings.insert("model-a".to_string(), 1700.0);
    state.votes.insert("model-a".to_string(), 9);

    state.backfill(&roster(&["model-a", "model-b"]));

    assert_eq!(state.ratings["model-a"], 1700.0);
    assert_eq!(state.votes["model-a"], 9);
    assert_eq!(state.ratings["model-b"], INITIAL_RATING);
}

#[test]
fn test_no_temp_file_left_behind() {
    let dir = TempDir::new().expect("tempdir");
    let store = store_in(&dir, LockMode::File);

    store.update(|state| state.total_votes += 1).expect("update");

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left: {leftovers:?}");
}

fn concurrent_counter_exact(mode: LockMode) {
    const THREADS: usize = 8;
    const UPDATES: u64 = 25;

    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(store_in(&dir, mode));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..UPDATES {
                    store
                        .update(|state| state.total_votes += 1)
                        .expect("update");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread");
    }

    let state = store.read().expect("read");
    assert_eq!(state.total_votes, THREADS as u64 * UPDATES);
}

#[test]
fn test_concurrent_updates_never_lose_counts_process_lock() {
    concurrent_counter_exact(LockMode::Process);
}

#[test]
fn test_concurrent_updates_never_lose_counts_file_lock() {
    concurrent_counter_exact(LockMode::File);
}

#[test]
fn test_readers_see_complete_documents_during_writes() {
    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(store_in(&dir, LockMode::File));

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..50 {
                store
                    .update(|state| state.total_votes += 1)
                    .expect("update");
            }
        })
    };

    for _ in 0..50 {
        // Every snapshot must parse and carry the full backfilled roster.
        let state = store.read().expect("read");
        assert!(state.ratings.contains_key("model-a"));
        assert!(state.ratings.contains_key("model-b"));
    }

    writer.join().expect("writer");
}
