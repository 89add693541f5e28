//! LLM request/response types
//!
//! Modeled on the OpenAI-compatible chat completions shape Groq exposes, but
//! provider-agnostic enough to support other providers.

use serde::{Deserialize, Serialize};

/// A completion request - everything needed for one generation call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt
    pub system_prompt: String,

    /// User/assistant messages (typically a single user message)
    pub messages: Vec<Message>,

    /// Max tokens for the response (capped by the client's config)
    pub max_tokens: u32,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// The result of a completion call
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text, if any
    pub content: Option<String>,
    /// Token usage for the call
    pub usage: TokenUsage,
}
