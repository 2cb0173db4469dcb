//! Integration tests for the persisted session store.
//!
//! Verifies the not-ready behavior for a missing session file, the JSON
//! shape on disk, and round-tripping through save/load/clear.

use tempfile::TempDir;

use siteflow_client::session::{Session, SessionStore};

// ---------------------------------------------------------------------------
// Test: missing file is the "not ready" condition, not an error
// ---------------------------------------------------------------------------

/// A store pointed at a file that does not exist yet loads `None` -- the
/// identity-not-ready condition dependent fetches defer on.
#[test]
fn missing_session_file_loads_as_none() {
    let dir = TempDir::new().expect("temp dir");
    let store = SessionStore::new(dir.path().join("session.json"));

    let loaded = store.load().expect("load should not error");
    assert!(loaded.is_none());
}

/// A corrupt session file is an error, not a silent defer.
#[test]
fn malformed_session_file_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{not json").expect("write fixture");

    let store = SessionStore::new(path);
    assert!(store.load().is_err());
}

// ---------------------------------------------------------------------------
// Test: save / load / clear round trip
// ---------------------------------------------------------------------------

/// Saving creates parent directories and the loaded session matches what
/// was saved, including the `type` key on disk.
#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("session.json");
    let store = SessionStore::new(&path);

    let session = Session {
        id: 105,
        user_type: "supervisor".to_string(),
    };
    store.save(&session).expect("save");

    let raw = std::fs::read_to_string(&path).expect("session file exists");
    assert!(raw.contains("\"type\""), "wire key must be 'type': {raw}");

    let loaded = store.load().expect("load").expect("session present");
    assert_eq!(loaded, session);
    assert_eq!(loaded.encoded_id(), "MTA1");
}

/// Clearing removes the file; clearing again is a no-op.
#[test]
fn clear_removes_session_and_is_idempotent() {
    let dir = TempDir::new().expect("temp dir");
    let store = SessionStore::new(dir.path().join("session.json"));

    store
        .save(&Session {
            id: 7,
            user_type: "engineer".to_string(),
        })
        .expect("save");

    store.clear().expect("clear");
    assert!(store.load().expect("load").is_none());
    store.clear().expect("second clear is a no-op");
}
