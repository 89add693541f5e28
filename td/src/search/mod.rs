//! Web search abstraction
//!
//! The search stage of the pipeline goes through the SearchClient trait so
//! tests can run without network access.

mod tavily;

pub use tavily::TavilyClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during a search call
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Missing API key: environment variable {0} not set")]
    MissingApiKey(String),
}

/// Web search client.
///
/// Returns the provider's raw JSON payload; the pipeline stores it verbatim
/// as the search result for the run.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<serde_json::Value, SearchError>;
}
