//! End-to-end tests: pipeline runs, thread directory, deletion

use std::sync::Arc;

use async_trait::async_trait;
use tempfile::tempdir;

use tripdaemon::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, TokenUsage};
use tripdaemon::pipeline::{PipelineEngine, PipelineError, TripRequest};
use tripdaemon::search::{SearchClient, SearchError};
use tripdaemon::state::StateManager;
use tripdaemon::threads::ThreadDirectory;

struct FixedLlm {
    text: String,
}

#[async_trait]
impl LlmClient for FixedLlm {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: Some(self.text.clone()),
            usage: TokenUsage::default(),
        })
    }
}

struct FixedSearch;

#[async_trait]
impl SearchClient for FixedSearch {
    async fn search(&self, _query: &str) -> Result<serde_json::Value, SearchError> {
        Ok(serde_json::json!({"results": ["sample result"]}))
    }
}

fn make_engine(state: &StateManager) -> PipelineEngine {
    PipelineEngine::new(
        state.clone(),
        Arc::new(FixedSearch),
        Arc::new(FixedLlm {
            text: "Day 1: arrive.".to_string(),
        }),
        4096,
    )
}

fn request(thread_id: &str, destination: &str, budget: f64) -> TripRequest {
    TripRequest {
        thread_id: thread_id.to_string(),
        destination: destination.to_string(),
        budget,
        dates: "10-15 October".to_string(),
        preferences: "Culture, food, budget-friendly".to_string(),
    }
}

#[tokio::test]
async fn full_lifecycle_plan_list_fetch_delete() {
    let temp = tempdir().unwrap();
    let state = StateManager::spawn(temp.path().join("trips.db")).unwrap();
    let engine = make_engine(&state);
    let directory = ThreadDirectory::new(state.clone());

    // Two runs on one thread, one run on another
    engine.run(&request("trip-1", "Naran", 60000.0)).await.unwrap();
    engine.run(&request("trip-1", "Naran", 60000.0)).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    engine.run(&request("trip-2", "Hunza", 80000.0)).await.unwrap();

    // Listing shows both threads, newest first, labeled from the first run
    let threads = directory.list_threads().await.unwrap();
    assert_eq!(threads.len(), 2);
    assert_eq!(threads[0].thread_id, "trip-2");
    assert_eq!(threads[0].thread_name, "Hunza from 10-15 October");
    assert_eq!(threads[1].thread_id, "trip-1");

    // Fetching a thread returns its turns in order
    let turns = directory.fetch_thread("trip-1").await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].destination, "Naran");
    assert_eq!(turns[0].plan, "Day 1: arrive.");

    // Deletion removes the thread and is idempotent
    let removed = state.delete_thread("trip-1").await.unwrap();
    assert_eq!(removed, 2);
    assert!(directory.fetch_thread("trip-1").await.unwrap().is_empty());
    assert_eq!(state.delete_thread("trip-1").await.unwrap(), 0);

    let threads = directory.list_threads().await.unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].thread_id, "trip-2");

    state.shutdown().await.unwrap();
}

#[tokio::test]
async fn history_survives_restart() {
    let temp = tempdir().unwrap();
    let db_path = temp.path().join("trips.db");

    {
        let state = StateManager::spawn(&db_path).unwrap();
        let engine = make_engine(&state);
        engine.run(&request("trip-1", "Naran", 60000.0)).await.unwrap();
        state.shutdown().await.unwrap();
    }

    // A fresh manager over the same file sees the prior history
    let state = StateManager::spawn(&db_path).unwrap();
    let engine = make_engine(&state);
    let result = engine.run(&request("trip-1", "Naran", 60000.0)).await.unwrap();

    assert_eq!(result.history.len(), 4);
    assert!(result.history[0].content.starts_with("Plan a trip to Naran"));

    state.shutdown().await.unwrap();
}

#[tokio::test]
async fn invalid_budget_leaves_no_trace() {
    let temp = tempdir().unwrap();
    let state = StateManager::spawn(temp.path().join("trips.db")).unwrap();
    let engine = make_engine(&state);
    let directory = ThreadDirectory::new(state.clone());

    let err = engine.run(&request("trip-1", "Naran", -100.0)).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidBudget));

    assert!(directory.list_threads().await.unwrap().is_empty());

    state.shutdown().await.unwrap();
}

#[tokio::test]
async fn low_budget_advisory_is_checkpointed() {
    let temp = tempdir().unwrap();
    let state = StateManager::spawn(temp.path().join("trips.db")).unwrap();
    let engine = make_engine(&state);
    let directory = ThreadDirectory::new(state.clone());

    let result = engine.run(&request("trip-1", "Naran", 300.0)).await.unwrap();
    assert!(result.skip_itinerary);
    assert!(result.plan.contains("seems too low"));

    let turns = directory.fetch_thread("trip-1").await.unwrap();
    assert_eq!(turns.len(), 1);
    assert!(turns[0].plan.contains("seems too low"));

    state.shutdown().await.unwrap();
}
