//! Chat-model access for dietary analysis and preference interpretation.
//!
//! The analysis service and the preference interpreter only see the
//! [`ChatModel`] trait. Production uses [`OpenAiClient`]; tests use
//! [`MockChatModel`].

pub mod json;
pub mod mock;
pub mod openai;

use std::time::Duration;

use async_trait::async_trait;

pub use mock::MockChatModel;
pub use openai::{OpenAiClient, OpenAiConfig};

/// Fixed system role shared by every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant that analyzes food items and dietary preferences. Always respond with valid JSON when requested.";

/// A single-turn chat request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
}

impl ChatRequest {
    /// Request with the shared system prompt.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            user: user.into(),
        }
    }
}

/// Failures talking to the model provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AiError {
    #[error("AI provider credential is not configured")]
    MissingCredential,

    #[error("AI request failed: {0}")]
    Transport(String),

    #[error("AI provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("AI request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("AI provider returned no content")]
    EmptyReply,
}

/// A language model that answers a single prompt with free-form text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the request and return the reply text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, AiError>;

    /// Model identifier (for logging).
    fn model_name(&self) -> &str;
}

/// Run a model call under a deadline. Elapsed deadline is a call failure.
pub async fn complete_with_timeout(
    model: &dyn ChatModel,
    request: &ChatRequest,
    limit: Duration,
) -> Result<String, AiError> {
    match tokio::time::timeout(limit, model.complete(request)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                model = model.model_name(),
                timeout_secs = limit.as_secs(),
                "AI request timed out"
            );
            Err(AiError::Timeout(limit))
        }
    }
}
