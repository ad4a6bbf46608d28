//! Integration test for the auth-session store lifecycle.
//!
//! Exercises: open_db, migrate, load_session, save_session, clear_session.

use sdlcv_core::db;
use sdlcv_core::types::AuthSession;

fn temp_db_path() -> String {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.keep().join("test.db");
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn full_session_lifecycle() {
    let path = temp_db_path();
    let conn = db::open_db(&path).await.unwrap();

    // Verify schema_version = 1
    let version: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row(
                "SELECT MAX(version) FROM schema_version",
                [],
                |r| r.get(0),
            )?)
        })
        .await
        .unwrap();
    assert_eq!(version, 1, "schema_version should be 1");

    // Verify WAL mode
    let journal: String = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(
                db.query_row("PRAGMA journal_mode", [], |r| r.get(0))?,
            )
        })
        .await
        .unwrap();
    assert_eq!(journal, "wal", "journal_mode should be wal");

    // Fresh DB holds no session
    let loaded = db::load_session(&conn).await.unwrap();
    assert!(loaded.is_none(), "fresh DB should have no session");

    // Save and load
    let session = AuthSession {
        user_id: "uid-123".into(),
        role: None,
        signed_in_at: db::now_secs(),
    };
    db::save_session(&conn, session.clone()).await.unwrap();
    let loaded = db::load_session(&conn).await.unwrap();
    assert_eq!(loaded, Some(session.clone()));

    // Signing in again overwrites the single row
    let reviewer = AuthSession {
        user_id: "reviewer-1".into(),
        role: Some("reviewer".into()),
        signed_in_at: session.signed_in_at + 60,
    };
    db::save_session(&conn, reviewer.clone()).await.unwrap();
    let count: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(
                db.query_row("SELECT COUNT(*) FROM auth_session", [], |r| r.get(0))?,
            )
        })
        .await
        .unwrap();
    assert_eq!(count, 1, "auth_session should hold at most one row");
    let loaded = db::load_session(&conn).await.unwrap().unwrap();
    assert_eq!(loaded.user_id, "reviewer-1");
    assert!(loaded.is_reviewer());

    // Verify persistence: open a second connection to the same DB
    let conn2 = db::open_db(&path).await.unwrap();
    let loaded2 = db::load_session(&conn2).await.unwrap();
    assert_eq!(loaded2, Some(reviewer), "session should persist across connections");

    // Clear on sign-out
    db::clear_session(&conn).await.unwrap();
    let loaded = db::load_session(&conn).await.unwrap();
    assert!(loaded.is_none(), "cleared session should not load");

    // Clearing again is a no-op
    db::clear_session(&conn).await.unwrap();
}
