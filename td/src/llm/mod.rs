//! LLM provider abstraction
//!
//! The pipeline talks to generation through the LlmClient trait; the concrete
//! provider is selected from configuration at startup.

mod client;
mod error;
mod groq;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use groq::GroqClient;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, TokenUsage};

#[cfg(test)]
pub use client::mock::MockLlmClient;

use std::sync::Arc;
use tracing::debug;

use crate::config::LlmConfig;

/// Create a generation client from configuration
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "groq" => Ok(Arc::new(GroqClient::from_config(config)?)),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: {other}"
        ))),
    }
}
