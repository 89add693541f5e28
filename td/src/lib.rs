//! TripDaemon - checkpointed trip-planning pipeline
//!
//! TripDaemon runs a four-stage pipeline (web search, budget allocation,
//! budget check, itinerary generation) for every trip request and checkpoints
//! the full pipeline state per conversation thread. Threads can be listed,
//! replayed, and deleted over an HTTP API or from the CLI.
//!
//! # Core Concepts
//!
//! - **Append-only checkpoints**: every pipeline run snapshots its full state;
//!   nothing is mutated in place
//! - **Threads**: a thread groups the runs of one conversation and carries
//!   history forward between them
//! - **Degraded search**: search failures are recorded in the state and the
//!   run continues; only generation failures abort it
//!
//! # Modules
//!
//! - [`pipeline`] - the four-stage planning engine
//! - [`state`] - actor that owns the checkpoint store
//! - [`threads`] - listing and fetching saved threads
//! - [`llm`] - LLM client trait and Groq implementation
//! - [`search`] - web search trait and Tavily implementation
//! - [`server`] - HTTP API
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod pipeline;
pub mod search;
pub mod server;
pub mod state;
pub mod threads;

// Re-export commonly used types
pub use config::{Config, LlmConfig, SearchConfig, ServerConfig, StorageConfig};
pub use domain::{Checkpoint, CheckpointStore, HistoryEntry, StoreError, TripState};
pub use llm::{create_client, CompletionRequest, CompletionResponse, GroqClient, LlmClient, LlmError};
pub use pipeline::{PipelineEngine, PipelineError, TripRequest};
pub use search::{SearchClient, SearchError, TavilyClient};
pub use state::{StateCommand, StateError, StateManager, StateResponse};
pub use threads::{ThreadDirectory, ThreadSummary, ThreadTurn};
