//! Ollama chat client using the `/api/chat` endpoint.
//!
//! This module is only available when the `ollama` feature is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use rfp_model::{Llm, LlmRequest, OllamaClient};
//!
//! let model = OllamaClient::new("http://localhost:11434", "qwen3:0.6b")?;
//! let reply = model.generate(LlmRequest::prompt("Summarise this RFP").with_temperature(0.1)).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::llm::{GenerateConfig, Llm, LlmRequest, LlmResponse, Message};

/// The default Ollama server address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// The default chat model.
pub const DEFAULT_MODEL: &str = "qwen3:0.6b";

const PROVIDER: &str = "ollama";

/// Chat client for a local Ollama server.
///
/// Requests are sent with `stream: false`, so every call returns one
/// complete reply.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create a client for `model` on the server at `base_url`.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ModelError::Config(format!(
                "base URL must be an http(s) URL, got '{base_url}'"
            )));
        }
        let model = model.into();
        if model.trim().is_empty() {
            return Err(ModelError::Config("model name must not be empty".into()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    /// Apply a request timeout to every call.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    fn connection_error(e: reqwest::Error) -> ModelError {
        ModelError::Connection { provider: PROVIDER.into(), message: e.to_string() }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a GenerateConfig>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

#[async_trait]
impl Llm for OllamaClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        debug!(provider = PROVIDER, model = %self.model, messages = request.messages.len(), "chat request");

        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            stream: false,
            options: request.config.as_ref(),
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "chat request failed");
                Self::connection_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message =
                serde_json::from_str::<ErrorResponse>(&text).map(|e| e.error).unwrap_or(text);
            error!(provider = PROVIDER, %status, "chat API error");
            return Err(ModelError::Api {
                provider: PROVIDER.into(),
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("failed to parse chat reply: {e}")))?;

        let message = parsed
            .message
            .ok_or_else(|| ModelError::InvalidResponse("chat reply has no message".into()))?;

        Ok(LlmResponse {
            content: message.content,
            model: parsed.model.unwrap_or_else(|| self.model.clone()),
        })
    }

    async fn health_check(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(Self::connection_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ModelError::Api {
                provider: PROVIDER.into(),
                status: response.status().as_u16(),
                message: "health probe failed".into(),
            })
        }
    }
}
