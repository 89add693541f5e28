//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless generation client - each call is independent.
///
/// The pipeline formats a full prompt from the current trip state on every
/// run; no conversation state is maintained inside the client.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::llm::TokenUsage;

    /// Mock generation client for unit tests
    pub struct MockLlmClient {
        responses: Vec<Result<String, String>>,
        call_count: AtomicUsize,
    }

    impl MockLlmClient {
        /// Always returns the same text
        pub fn fixed(text: impl Into<String>) -> Self {
            Self {
                responses: vec![Ok(text.into())],
                call_count: AtomicUsize::new(0),
            }
        }

        /// Always fails with an InvalidResponse error
        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                responses: vec![Err(message.into())],
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            // Fixed clients repeat their single response on every call
            match &self.responses[0] {
                Ok(text) => Ok(CompletionResponse {
                    content: Some(text.clone()),
                    usage: TokenUsage::default(),
                }),
                Err(message) => Err(LlmError::InvalidResponse(message.clone())),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::llm::Message;

        #[tokio::test]
        async fn test_mock_client_returns_fixed_response() {
            let client = MockLlmClient::fixed("Day 1: arrive.");

            let req = CompletionRequest {
                system_prompt: "Test".to_string(),
                messages: vec![Message::user("hello")],
                max_tokens: 1000,
            };

            let resp = client.complete(req.clone()).await.unwrap();
            assert_eq!(resp.content.as_deref(), Some("Day 1: arrive."));

            let resp = client.complete(req).await.unwrap();
            assert_eq!(resp.content.as_deref(), Some("Day 1: arrive."));
            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_failing() {
            let client = MockLlmClient::failing("boom");

            let req = CompletionRequest {
                system_prompt: "Test".to_string(),
                messages: vec![],
                max_tokens: 1000,
            };

            assert!(client.complete(req).await.is_err());
            assert_eq!(client.call_count(), 1);
        }
    }
}
