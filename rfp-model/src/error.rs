//! Error types for chat model clients.

use thiserror::Error;

/// Errors that can occur when calling a chat model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model server could not be reached or the request timed out.
    #[error("Connection to {provider} failed: {message}")]
    Connection { provider: String, message: String },

    /// The model server answered with a non-success status.
    #[error("{provider} API returned {status}: {message}")]
    Api { provider: String, status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ModelError {
    /// Returns `true` when the model server was unreachable.
    pub fn is_connection(&self) -> bool {
        matches!(self, ModelError::Connection { .. })
    }
}

/// Result type alias for ModelError
pub type Result<T> = std::result::Result<T, ModelError>;
