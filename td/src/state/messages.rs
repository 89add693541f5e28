//! State manager messages
//!
//! Commands and responses for the actor pattern.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{Checkpoint, TripState};

/// Errors from state operations
///
/// Absent records are not errors here: lookups return `Option::None` or an
/// empty vec, and callers decide whether that is a not-found condition.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Channel error")]
    ChannelError,
}

/// Response from state operations
pub type StateResponse<T> = Result<T, StateError>;

/// Commands sent to the StateManager actor
#[derive(Debug)]
pub enum StateCommand {
    // Checkpoint operations
    AppendCheckpoint {
        thread_id: String,
        state: TripState,
        reply: oneshot::Sender<StateResponse<DateTime<Utc>>>,
    },
    ListCheckpoints {
        thread_id: String,
        reply: oneshot::Sender<StateResponse<Vec<Checkpoint<TripState>>>>,
    },
    LatestCheckpoint {
        thread_id: String,
        reply: oneshot::Sender<StateResponse<Option<Checkpoint<TripState>>>>,
    },

    // Thread operations
    ListThreadIds {
        reply: oneshot::Sender<StateResponse<Vec<String>>>,
    },
    DeleteThread {
        thread_id: String,
        reply: oneshot::Sender<StateResponse<usize>>,
    },

    // Shutdown
    Shutdown,
}
