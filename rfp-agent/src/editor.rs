//! The editor agent: retrieved context → improved RFP content.

use std::sync::Arc;

use rfp_model::{Llm, LlmRequest};
use tracing::{error, info};

use crate::error::{AgentError, Result};
use crate::prompt;
use crate::suggestion::{Suggestion, SuggestionOrigin};

pub const EDITOR_AGENT: &str = "RFP Editor Agent";

/// Default sampling temperature for editor calls.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    pub temperature: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { temperature: DEFAULT_TEMPERATURE }
    }
}

/// Which prompt the editor runs.
#[derive(Debug, Clone, PartialEq)]
pub enum EditMode {
    /// First analysis of retrieved content.
    Initial,
    /// Revise `previous` after the user rejected it.
    Rephrase { previous: String, critique: Option<String> },
    /// Take the user's own text as the result. No model call.
    ManualEdit { text: String },
}

/// Produces suggestions from a chat model.
pub struct EditorAgent {
    llm: Arc<dyn Llm>,
    config: EditorConfig,
}

impl EditorAgent {
    pub fn new(llm: Arc<dyn Llm>, config: EditorConfig) -> Self {
        Self { llm, config }
    }

    pub fn llm(&self) -> &Arc<dyn Llm> {
        &self.llm
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Produce a suggestion for `query` over `context`.
    pub async fn edit(&self, query: &str, context: &str, mode: EditMode) -> Result<Suggestion> {
        match mode {
            EditMode::Initial => {
                info!(agent = EDITOR_AGENT, "analyzing content for improvement");
                let text = self.complete(prompt::analysis(query, context)).await?;
                Ok(Suggestion::new(text, SuggestionOrigin::Generated))
            }
            EditMode::Rephrase { previous, critique } => {
                if previous.trim().is_empty() {
                    return Err(AgentError::EmptyInput("suggestion".into()));
                }
                info!(agent = EDITOR_AGENT, "rephrasing after rejection");
                let text = self
                    .complete(prompt::rephrase(query, context, &previous, critique.as_deref()))
                    .await?;
                Ok(Suggestion::new(text, SuggestionOrigin::Revised))
            }
            EditMode::ManualEdit { text } => {
                if text.trim().is_empty() {
                    return Err(AgentError::EmptyInput("edit_text".into()));
                }
                Ok(Suggestion::new(text, SuggestionOrigin::Edited))
            }
        }
    }

    /// Plain answer to `query` from `context`, without best-practice framing.
    pub async fn answer(&self, query: &str, context: &str) -> Result<String> {
        self.complete(prompt::answer(query, context)).await
    }

    async fn complete(&self, prompt: String) -> Result<String> {
        let request = LlmRequest::prompt(prompt).with_temperature(self.config.temperature);
        let response = self.llm.generate(request).await.map_err(|e| {
            error!(agent = EDITOR_AGENT, model = self.llm.name(), error = %e, "generation failed");
            AgentError::Generation(e)
        })?;

        if response.content.trim().is_empty() {
            error!(agent = EDITOR_AGENT, model = self.llm.name(), "empty completion");
            return Err(AgentError::EmptyGeneration);
        }
        info!(agent = EDITOR_AGENT, chars = response.content.len(), "generated suggestion");
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use rfp_model::MockLlm;

    use super::*;

    fn editor(llm: Arc<MockLlm>) -> EditorAgent {
        EditorAgent::new(llm, EditorConfig::default())
    }

    #[tokio::test]
    async fn initial_uses_analysis_prompt_and_temperature() {
        let llm = Arc::new(MockLlm::new("mock").with_reply("A clear scope."));
        let suggestion =
            editor(llm.clone()).edit("scope", "ctx", EditMode::Initial).await.unwrap();

        assert_eq!(suggestion.origin, SuggestionOrigin::Generated);
        assert_eq!(suggestion.text, "A clear scope.");
        let request = &llm.requests()[0];
        assert!(request.user_text().contains("USER QUERY: scope"));
        assert_eq!(request.config.as_ref().unwrap().temperature, Some(DEFAULT_TEMPERATURE));
    }

    #[tokio::test]
    async fn blank_completion_is_empty_generation() {
        let llm = Arc::new(MockLlm::new("mock").with_reply("  \n"));
        let err = editor(llm).edit("q", "ctx", EditMode::Initial).await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyGeneration));
    }

    #[tokio::test]
    async fn unreachable_model_is_generation_error() {
        let llm = Arc::new(MockLlm::new("mock").with_connection_error());
        let err = editor(llm).edit("q", "ctx", EditMode::Initial).await.unwrap_err();
        assert!(matches!(err, AgentError::Generation(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn manual_edit_skips_the_model() {
        let llm = Arc::new(MockLlm::new("mock"));
        let mode = EditMode::ManualEdit { text: "  my wording ".into() };
        let suggestion = editor(llm.clone()).edit("q", "ctx", mode).await.unwrap();
        assert_eq!(suggestion.text, "  my wording ");
        assert_eq!(suggestion.origin, SuggestionOrigin::Edited);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_manual_edit_is_rejected() {
        let llm = Arc::new(MockLlm::new("mock"));
        let mode = EditMode::ManualEdit { text: " ".into() };
        let err = editor(llm).edit("q", "ctx", mode).await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyInput(_)));
    }
}
