//! Error types for the `rfp-rag` crate.

use thiserror::Error;

/// Errors that can occur in ingestion and retrieval.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during document chunking.
    #[error("Chunking error: {0}")]
    ChunkingError(String),

    /// Text could not be extracted from an uploaded file.
    #[error("Extraction error ({source_name}): {message}")]
    ExtractionError {
        /// The file name or source identifier being extracted.
        source_name: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in the ingest/query orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),
}

impl RagError {
    /// Returns `true` when the failure came from an external service
    /// (embedding backend or document store) rather than from local input.
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            RagError::EmbeddingError { .. }
                | RagError::VectorStoreError { .. }
                | RagError::PipelineError(_)
        )
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
