//! Deterministic mock provider.
//!
//! Answers without any network access. Used by tests and by
//! `--provider mock` for trying the service offline.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use supportbot_core::{AppError, AppResult};

#[derive(Debug, Clone)]
enum Behavior {
    Reply(String),
    Echo,
    Fail(String),
}

/// Mock answer service.
#[derive(Debug)]
pub struct MockClient {
    behavior: Behavior,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_request: Mutex<Option<LlmRequest>>,
}

impl MockClient {
    /// Always answer with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reply(reply.into()))
    }

    /// Answer with the prompt it was given.
    pub fn echo() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    /// Fail every call with an [`AppError::Llm`] carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of completions requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent completion request.
    pub fn last_request(&self) -> Option<LlmRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }

    /// Prompt of the most recent completion.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_request().map(|request| request.prompt)
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::replying("This is a mock answer.")
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let content = match &self.behavior {
            Behavior::Reply(reply) => reply.clone(),
            Behavior::Echo => request.prompt.clone(),
            Behavior::Fail(message) => return Err(AppError::Llm(message.clone())),
        };

        let prompt_tokens = request.prompt.split_whitespace().count() as u32;
        let completion_tokens = content.split_whitespace().count() as u32;

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::new(prompt_tokens, completion_tokens),
        })
    }
}
