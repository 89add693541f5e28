//! Thread directory - listing and fetching saved trip threads
//!
//! Projects the checkpoint log into the summaries and turns the API and CLI
//! expose. A thread with no checkpoints does not exist from here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::state::{StateManager, StateResponse};

/// One thread in the directory listing
#[derive(Debug, Clone, Serialize)]
pub struct ThreadSummary {
    pub thread_id: String,
    pub thread_name: String,
    pub timestamp: DateTime<Utc>,
}

/// One checkpointed turn of a thread, without search payload or history
#[derive(Debug, Clone, Serialize)]
pub struct ThreadTurn {
    pub thread_id: String,
    pub timestamp: DateTime<Utc>,
    pub destination: String,
    pub budget: f64,
    pub dates: String,
    pub preferences: String,
    pub plan: String,
    pub cost_breakdown: BTreeMap<String, f64>,
}

/// Read-side view over the checkpoint store
#[derive(Clone)]
pub struct ThreadDirectory {
    state: StateManager,
}

impl ThreadDirectory {
    pub fn new(state: StateManager) -> Self {
        Self { state }
    }

    /// List all threads, newest first.
    ///
    /// A thread is labeled from its first checkpoint and dated from it too,
    /// so the label stays stable as the conversation continues.
    pub async fn list_threads(&self) -> StateResponse<Vec<ThreadSummary>> {
        debug!("list_threads: called");
        let thread_ids = self.state.list_thread_ids().await?;

        let mut summaries = Vec::with_capacity(thread_ids.len());
        for thread_id in thread_ids {
            let checkpoints = self.state.list_checkpoints(&thread_id).await?;
            let Some(first) = checkpoints.first() else {
                continue;
            };

            summaries.push(ThreadSummary {
                thread_id,
                thread_name: format!("{} from {}", first.state.destination, first.state.dates),
                timestamp: first.ts,
            });
        }

        summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(summaries)
    }

    /// Fetch the checkpointed turns of a thread in insertion order.
    ///
    /// Returns an empty vec for an unknown thread; callers decide whether
    /// that is a not-found condition.
    pub async fn fetch_thread(&self, thread_id: &str) -> StateResponse<Vec<ThreadTurn>> {
        debug!(%thread_id, "fetch_thread: called");
        let checkpoints = self.state.list_checkpoints(thread_id).await?;

        Ok(checkpoints
            .into_iter()
            .map(|cp| ThreadTurn {
                thread_id: cp.thread_id,
                timestamp: cp.ts,
                destination: cp.state.destination,
                budget: cp.state.budget,
                dates: cp.state.dates,
                preferences: cp.state.preferences,
                plan: cp.state.plan,
                cost_breakdown: cp.state.cost_breakdown,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TripState;

    fn state_for(destination: &str, dates: &str) -> TripState {
        TripState::from_request(destination, 60000.0, dates, "Culture", Vec::new())
    }

    #[tokio::test]
    async fn test_list_threads_newest_first_with_labels() {
        let manager = StateManager::spawn_in_memory().unwrap();
        let directory = ThreadDirectory::new(manager.clone());

        manager
            .append_checkpoint("t-1", state_for("Naran", "10-15 October"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        manager
            .append_checkpoint("t-2", state_for("Hunza", "1-5 November"))
            .await
            .unwrap();

        let threads = directory.list_threads().await.unwrap();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].thread_id, "t-2");
        assert_eq!(threads[0].thread_name, "Hunza from 1-5 November");
        assert_eq!(threads[1].thread_name, "Naran from 10-15 October");

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_label_comes_from_first_checkpoint() {
        let manager = StateManager::spawn_in_memory().unwrap();
        let directory = ThreadDirectory::new(manager.clone());

        manager
            .append_checkpoint("t-1", state_for("Naran", "10-15 October"))
            .await
            .unwrap();
        manager
            .append_checkpoint("t-1", state_for("Skardu", "20-25 October"))
            .await
            .unwrap();

        let threads = directory.list_threads().await.unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].thread_name, "Naran from 10-15 October");

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_thread_projects_turns() {
        let manager = StateManager::spawn_in_memory().unwrap();
        let directory = ThreadDirectory::new(manager.clone());

        let mut state = state_for("Naran", "10-15 October");
        state.plan = "Day 1: arrive.".to_string();
        state.search_result = "raw payload".to_string();
        manager.append_checkpoint("t-1", state).await.unwrap();

        let turns = directory.fetch_thread("t-1").await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].destination, "Naran");
        assert_eq!(turns[0].plan, "Day 1: arrive.");

        // The projection leaves search results and history out
        let json = serde_json::to_value(&turns[0]).unwrap();
        assert!(json.get("search_result").is_none());
        assert!(json.get("history").is_none());

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_unknown_thread_is_empty() {
        let manager = StateManager::spawn_in_memory().unwrap();
        let directory = ThreadDirectory::new(manager.clone());

        let turns = directory.fetch_thread("nonexistent").await.unwrap();
        assert!(turns.is_empty());

        manager.shutdown().await.unwrap();
    }
}
