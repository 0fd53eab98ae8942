//! Scripted chat model for tests — replays queued replies in order.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{AiError, ChatModel, ChatRequest};

/// A chat model that answers from a queue and records every request.
///
/// An empty queue answers with a transport error, so an unexpected extra
/// call fails loudly instead of hanging.
#[derive(Default)]
pub struct MockChatModel {
    replies: Mutex<VecDeque<Result<String, AiError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    delay: Option<Duration>,
}

impl MockChatModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every reply (for timeout and concurrency tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.lock_replies().push_back(Ok(reply.into()));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: AiError) {
        self.lock_replies().push_back(Err(error));
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.lock_requests().len()
    }

    /// All requests received, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.lock_requests().clone()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, AiError>>> {
        self.replies.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<ChatRequest>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String, AiError> {
        self.lock_requests().push(request.clone());
        let reply = self.lock_replies().pop_front();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        reply.unwrap_or_else(|| Err(AiError::Transport("no scripted reply".into())))
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
