//! Error types for the agent layer.

use rfp_model::ModelError;
use rfp_rag::RagError;
use thiserror::Error;

/// Errors surfaced by the retriever, the editor, and the orchestrator.
#[derive(Debug, Error)]
pub enum AgentError {
    /// A required input was missing or blank. Nothing downstream was contacted.
    #[error("{0} must not be empty")]
    EmptyInput(String),

    /// The document store or the embedding service failed.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RagError),

    /// The generation service failed or was unreachable.
    #[error("generation failed: {0}")]
    Generation(#[from] ModelError),

    /// The generation service answered with no text.
    #[error("generation service returned an empty completion")]
    EmptyGeneration,
}

impl AgentError {
    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AgentError::EmptyInput(_) => false,
            AgentError::Retrieval(e) => e.is_service_failure(),
            AgentError::Generation(e) => e.is_connection(),
            AgentError::EmptyGeneration => true,
        }
    }
}

/// Result type alias for AgentError
pub type Result<T> = std::result::Result<T, AgentError>;
