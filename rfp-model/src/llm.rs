//! The chat model abstraction shared by every agent.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Who authored a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Sampling options forwarded to the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A complete, non-streaming generation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    pub config: Option<GenerateConfig>,
}

impl LlmRequest {
    /// A request holding a single user prompt.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self { messages: vec![Message::user(text)], config: None }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.get_or_insert_with(GenerateConfig::default).temperature = Some(temperature);
        self
    }

    /// Concatenated text of every user message, mostly useful in tests.
    pub fn user_text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The model's reply.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
}

/// A chat model.
///
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Model name, as reported in logs and `/config`.
    fn name(&self) -> &str;

    /// Generate one complete reply.
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse>;

    /// Check that the model server is reachable.
    async fn health_check(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_creates_config() {
        let request = LlmRequest::prompt("hi").with_temperature(0.1);
        assert_eq!(request.config.unwrap().temperature, Some(0.1));
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_value(Message::assistant("ok")).unwrap();
        assert_eq!(json["role"], "assistant");
    }

    #[test]
    fn user_text_skips_system_messages() {
        let request = LlmRequest {
            messages: vec![Message::system("rules"), Message::user("a"), Message::user("b")],
            config: None,
        };
        assert_eq!(request.user_text(), "a\nb");
    }
}
