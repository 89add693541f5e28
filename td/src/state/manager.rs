//! StateManager - actor that owns CheckpointStore
//!
//! Processes commands via channels for thread-safe access to persistent state.

use std::path::Path;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::{Checkpoint, CheckpointStore, TripState};

use super::messages::{StateCommand, StateError, StateResponse};

/// Handle to send commands to the StateManager
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
}

impl StateManager {
    /// Spawn a new StateManager actor backed by a database file
    pub fn spawn(store_path: impl AsRef<Path>) -> eyre::Result<Self> {
        debug!(store_path = %store_path.as_ref().display(), "spawn: called");
        let store = CheckpointStore::open(store_path.as_ref())?;

        let (tx, rx) = mpsc::channel(256);

        // Spawn the actor task
        tokio::spawn(actor_loop(store, rx));

        info!("StateManager spawned");

        Ok(Self { tx })
    }

    /// Spawn a StateManager backed by an in-memory database
    ///
    /// State lives only as long as the actor task; useful for tests.
    pub fn spawn_in_memory() -> eyre::Result<Self> {
        debug!("spawn_in_memory: called");
        let store = CheckpointStore::open_in_memory()?;

        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(actor_loop(store, rx));

        Ok(Self { tx })
    }

    // === Checkpoint operations ===

    /// Append a checkpoint for a thread, returning the assigned timestamp
    pub async fn append_checkpoint(&self, thread_id: &str, state: TripState) -> StateResponse<DateTime<Utc>> {
        debug!(%thread_id, destination = %state.destination, "append_checkpoint: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(StateCommand::AppendCheckpoint {
                thread_id: thread_id.to_string(),
                state,
                reply: reply_tx,
            })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// List all checkpoints for a thread in insertion order
    pub async fn list_checkpoints(&self, thread_id: &str) -> StateResponse<Vec<Checkpoint<TripState>>> {
        debug!(%thread_id, "list_checkpoints: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(StateCommand::ListCheckpoints {
                thread_id: thread_id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Get the most recent checkpoint for a thread, if any
    pub async fn latest_checkpoint(&self, thread_id: &str) -> StateResponse<Option<Checkpoint<TripState>>> {
        debug!(%thread_id, "latest_checkpoint: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(StateCommand::LatestCheckpoint {
                thread_id: thread_id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    // === Thread operations ===

    /// List IDs of all threads with at least one checkpoint
    pub async fn list_thread_ids(&self) -> StateResponse<Vec<String>> {
        debug!("list_thread_ids: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(StateCommand::ListThreadIds { reply: reply_tx })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Delete all checkpoints for a thread, returning the number removed
    ///
    /// Idempotent: deleting an unknown thread returns 0.
    pub async fn delete_thread(&self, thread_id: &str) -> StateResponse<usize> {
        debug!(%thread_id, "delete_thread: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(StateCommand::DeleteThread {
                thread_id: thread_id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Shutdown the StateManager
    pub async fn shutdown(&self) -> Result<(), StateError> {
        debug!("shutdown: called");
        self.tx
            .send(StateCommand::Shutdown)
            .await
            .map_err(|_| StateError::ChannelError)
    }
}

/// The actor loop that owns the CheckpointStore and processes commands
async fn actor_loop(store: CheckpointStore, mut rx: mpsc::Receiver<StateCommand>) {
    debug!("StateManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StateCommand::AppendCheckpoint { thread_id, state, reply } => {
                debug!(%thread_id, "actor_loop: AppendCheckpoint command");
                let result = store
                    .append(&thread_id, &state)
                    .map_err(|e| StateError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }

            StateCommand::ListCheckpoints { thread_id, reply } => {
                debug!(%thread_id, "actor_loop: ListCheckpoints command");
                let result = store
                    .list_checkpoints(&thread_id)
                    .map_err(|e| StateError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }

            StateCommand::LatestCheckpoint { thread_id, reply } => {
                debug!(%thread_id, "actor_loop: LatestCheckpoint command");
                let result = store
                    .latest_checkpoint(&thread_id)
                    .map_err(|e| StateError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }

            StateCommand::ListThreadIds { reply } => {
                debug!("actor_loop: ListThreadIds command");
                let result = store
                    .list_thread_ids()
                    .map_err(|e| StateError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }

            StateCommand::DeleteThread { thread_id, reply } => {
                debug!(%thread_id, "actor_loop: DeleteThread command");
                let result = store
                    .delete_thread(&thread_id)
                    .map_err(|e| StateError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }

            StateCommand::Shutdown => {
                debug!("actor_loop: Shutdown command");
                info!("StateManager shutting down");
                break;
            }
        }
    }

    debug!("StateManager actor stopped");
}
