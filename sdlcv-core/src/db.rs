use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use crate::types::AuthSession;

/// Opens (or creates) the SQLite database at `path`, configures WAL mode,
/// and applies schema migrations via the `schema_version` table.
///
/// This function is the single entry point for all database connections.
/// It sets `busy_timeout` via the `Connection` method (not a PRAGMA string) to
/// ensure the setting takes effect regardless of pragma caching.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the file cannot be opened, WAL configuration
/// fails, or schema DDL fails.
pub async fn open_db(path: &str) -> Result<Connection, tokio_rusqlite::Error> {
    let conn = Connection::open(path).await?;

    // WAL pragmas are connection-level settings, re-applied on every open.
    conn.call(|db| {
        db.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;",
        )?;
        db.busy_timeout(Duration::from_secs(5))?;
        Ok(())
    })
    .await?;

    // Checkpoint any leftover WAL from a previous run.
    conn.call(|db| {
        db.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    })
    .await?;

    conn.call(|db| {
        crate::schema::migrate(db)?;
        Ok(())
    })
    .await?;

    Ok(conn)
}

/// Returns the current Unix timestamp in seconds.
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Loads the persisted session, if one exists.
///
/// Returns `None` on a fresh database or after [`clear_session`]. Called once
/// at startup before the first event-loop frame so the login screen can be
/// skipped when a session survives a restart.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the query fails.
pub async fn load_session(conn: &Connection) -> Result<Option<AuthSession>, tokio_rusqlite::Error> {
    conn.call(|db| {
        let session = db
            .query_row(
                "SELECT user_id, role, signed_in_at FROM auth_session WHERE slot = 'current'",
                [],
                |r| {
                    Ok(AuthSession {
                        user_id: r.get(0)?,
                        role: r.get(1)?,
                        signed_in_at: r.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(session)
    })
    .await
}

/// Persists `session` as the current identity, replacing any previous one.
///
/// Uses an upsert (`INSERT ... ON CONFLICT DO UPDATE`) inside `BEGIN IMMEDIATE`
/// so signing in over an existing session rewrites the single row in place.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the upsert transaction fails.
pub async fn save_session(
    conn: &Connection,
    session: AuthSession,
) -> Result<(), tokio_rusqlite::Error> {
    conn.call(move |db| {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO auth_session (slot, user_id, role, signed_in_at)
             VALUES ('current', ?1, ?2, ?3)
             ON CONFLICT(slot)
             DO UPDATE SET user_id = excluded.user_id,
                           role = excluded.role,
                           signed_in_at = excluded.signed_in_at",
            rusqlite::params![&session.user_id, &session.role, session.signed_in_at],
        )?;
        tx.commit()?;
        Ok(())
    })
    .await
}

/// Removes the persisted session on sign-out.
///
/// A no-op if nothing is persisted.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the delete transaction fails.
pub async fn clear_session(conn: &Connection) -> Result<(), tokio_rusqlite::Error> {
    conn.call(|db| {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM auth_session WHERE slot = 'current'", [])?;
        tx.commit()?;
        Ok(())
    })
    .await
}
