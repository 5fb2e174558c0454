//! Scripted chat model for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ModelError, Result};
use crate::llm::{Llm, LlmRequest, LlmResponse};

/// One scripted outcome.
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Unreachable,
}

/// A [`Llm`] that replays scripted replies and records every request.
///
/// When the script runs out the last reply is repeated. With no script at
/// all the model echoes a fixed line.
#[derive(Debug, Default)]
pub struct MockLlm {
    name: String,
    script: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    requests: Mutex<Vec<LlmRequest>>,
    healthy: bool,
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), healthy: true, ..Default::default() }
    }

    /// Queue a reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push(Reply::Text(text.into()));
        self
    }

    /// Queue a connection failure.
    pub fn with_connection_error(self) -> Self {
        self.push(Reply::Unreachable);
        self
    }

    /// Make `health_check` fail.
    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    fn push(&self, reply: Reply) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
    }

    /// Number of `generate` calls so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn next_reply(&self) -> Option<Reply> {
        let mut script = self.script.lock().ok()?;
        let mut last = self.last.lock().ok()?;
        if let Some(reply) = script.pop_front() {
            *last = Some(reply);
        }
        last.clone()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        match self.next_reply() {
            Some(Reply::Text(content)) => Ok(LlmResponse { content, model: self.name.clone() }),
            Some(Reply::Unreachable) => Err(ModelError::Connection {
                provider: "mock".into(),
                message: "connection refused".into(),
            }),
            None => Ok(LlmResponse { content: "Mock response".into(), model: self.name.clone() }),
        }
    }

    async fn health_check(&self) -> Result<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(ModelError::Connection { provider: "mock".into(), message: "down".into() })
        }
    }
}
