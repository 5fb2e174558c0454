//! Mapping from failures to HTTP responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rfp_agent::AgentError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("invalid request body: {0}")]
    InvalidRequest(String),

    #[error("unsupported file '{0}': only .pdf and .txt are accepted")]
    UnsupportedFile(String),

    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("upload exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("could not extract text: {0}")]
    Extraction(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Agent(AgentError::EmptyInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Agent(AgentError::Retrieval(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Agent(AgentError::Generation(e)) if e.is_connection() => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Agent(AgentError::Generation(_) | AgentError::EmptyGeneration) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::InvalidRequest(_)
            | ApiError::UnsupportedFile(_)
            | ApiError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            ApiError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Agent(AgentError::EmptyInput(_)) => "empty_input",
            ApiError::Agent(AgentError::Retrieval(_)) => "service_unavailable",
            ApiError::Agent(AgentError::Generation(e)) if e.is_connection() => {
                "service_unavailable"
            }
            ApiError::Agent(AgentError::Generation(_)) => "upstream_error",
            ApiError::Agent(AgentError::EmptyGeneration) => "generation_empty",
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::UnsupportedFile(_) => "unsupported_file",
            ApiError::InvalidUpload(_) => "invalid_upload",
            ApiError::TooLarge { .. } => "file_too_large",
            ApiError::Extraction(_) => "extraction_failed",
        }
    }

    pub fn retryable(&self) -> bool {
        match self {
            ApiError::Agent(AgentError::Retrieval(_)) => true,
            ApiError::Agent(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "request failed");
        } else {
            warn!(code = self.code(), error = %self, "request rejected");
        }
        let body =
            ErrorBody { error: self.code(), message: self.to_string(), retryable: self.retryable() };
        (status, Json(body)).into_response()
    }
}
