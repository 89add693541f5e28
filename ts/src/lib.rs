//! TripStore - append-only checkpoint log over SQLite
//!
//! A thread is an ordered sequence of immutable checkpoints. Each checkpoint
//! snapshots an arbitrary serde-serializable state together with a
//! store-assigned timestamp. Checkpoints are only ever appended or deleted
//! en masse per thread - there is no update path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod store;

pub use store::CheckpointStore;

/// One immutable, timestamped snapshot of state for a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint<T> {
    /// Opaque, caller-supplied thread identifier
    pub thread_id: String,
    /// Store-assigned timestamp; ordering and version marker for the thread
    pub ts: DateTime<Utc>,
    /// The snapshotted state
    pub state: T,
}

/// Errors from the durable store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid stored timestamp '{0}'")]
    InvalidTimestamp(String),
}
