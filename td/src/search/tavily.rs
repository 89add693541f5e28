//! Tavily search API client

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{SearchClient, SearchError};
use crate::config::SearchConfig;

/// Tavily API client
pub struct TavilyClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl TavilyClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in the config.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        debug!(base_url = %config.base_url, "from_config: called");
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| SearchError::MissingApiKey(config.api_key_env.clone()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(SearchError::Network)?;

        Ok(Self {
            api_key,
            base_url: config.base_url.clone(),
            http,
        })
    }

    /// Build the request body for the search endpoint
    fn build_request_body(&self, query: &str) -> serde_json::Value {
        serde_json::json!({
            "api_key": self.api_key,
            "query": query,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(&self, query: &str) -> Result<serde_json::Value, SearchError> {
        debug!(%query, "search: called");

        let response = self
            .http
            .post(self.search_url())
            .json(&self.build_request_body(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "search: API error");
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        debug!("search: success");
        Ok(response.json().await?)
    }
}
