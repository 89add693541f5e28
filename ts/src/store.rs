//! Core CheckpointStore implementation

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{Checkpoint, StoreError};

/// Append-only checkpoint log keyed by thread id.
///
/// Owns a single SQLite connection. The store itself is synchronous; callers
/// that need shared access wrap it in an actor or a lock so writes stay
/// serialized (one writer at a time).
pub struct CheckpointStore {
    conn: Connection,
}

impl CheckpointStore {
    /// Open or create a store at the given database path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Opened checkpoint store");
        Self::init(conn)
    }

    /// Open an in-memory store (tests and one-shot runs)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        // Insertion order is the rowid; thread_id is the sole partition key.
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS checkpoints (
                 id        INTEGER PRIMARY KEY AUTOINCREMENT,
                 thread_id TEXT NOT NULL,
                 ts        TEXT NOT NULL,
                 state     TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_checkpoints_thread
                 ON checkpoints (thread_id);",
        )?;
        Ok(Self { conn })
    }

    /// Append one immutable checkpoint for a thread.
    ///
    /// The timestamp is assigned here, at append time, and returned so the
    /// caller can echo it back. Prior checkpoints are never touched.
    pub fn append<T: Serialize>(&self, thread_id: &str, state: &T) -> Result<DateTime<Utc>, StoreError> {
        let ts = Utc::now();
        let state_json = serde_json::to_string(state)?;
        self.conn.execute(
            "INSERT INTO checkpoints (thread_id, ts, state) VALUES (?1, ?2, ?3)",
            params![thread_id, format_ts(&ts), state_json],
        )?;
        debug!(%thread_id, ts = %format_ts(&ts), "Appended checkpoint");
        Ok(ts)
    }

    /// All checkpoints for a thread, oldest first (insertion order)
    pub fn list_checkpoints<T: DeserializeOwned>(&self, thread_id: &str) -> Result<Vec<Checkpoint<T>>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT ts, state FROM checkpoints WHERE thread_id = ?1 ORDER BY id ASC")?;
        let rows = stmt.query_map(params![thread_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut checkpoints = Vec::new();
        for row in rows {
            let (ts, state_json) = row?;
            checkpoints.push(Checkpoint {
                thread_id: thread_id.to_string(),
                ts: parse_ts(&ts)?,
                state: serde_json::from_str(&state_json)?,
            });
        }
        Ok(checkpoints)
    }

    /// The most recently appended checkpoint for a thread, if any
    pub fn latest_checkpoint<T: DeserializeOwned>(&self, thread_id: &str) -> Result<Option<Checkpoint<T>>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT ts, state FROM checkpoints WHERE thread_id = ?1 ORDER BY id DESC LIMIT 1")?;
        let mut rows = stmt.query_map(params![thread_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        match rows.next().transpose()? {
            Some((ts, state_json)) => Ok(Some(Checkpoint {
                thread_id: thread_id.to_string(),
                ts: parse_ts(&ts)?,
                state: serde_json::from_str(&state_json)?,
            })),
            None => Ok(None),
        }
    }

    /// Every distinct thread id with at least one checkpoint
    pub fn list_thread_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT DISTINCT thread_id FROM checkpoints")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }

    /// Delete all checkpoints for a thread.
    ///
    /// Idempotent: an absent or already-empty thread deletes zero rows and
    /// is not an error. Returns the number of checkpoints removed.
    pub fn delete_thread(&self, thread_id: &str) -> Result<usize, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM checkpoints WHERE thread_id = ?1", params![thread_id])?;
        if deleted > 0 {
            info!(%thread_id, deleted, "Deleted thread");
        }
        Ok(deleted)
    }
}

/// RFC 3339 with microsecond precision, e.g. "2025-10-01T10:16:46.304782+00:00"
fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StoreError::InvalidTimestamp(raw.to_string()))
}
