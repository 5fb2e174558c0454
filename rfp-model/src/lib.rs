//! # rfp-model
//!
//! Chat model integrations for the RFP assistant.
//!
//! - [`OllamaClient`] - a local Ollama server over HTTP (`ollama` feature)
//! - [`MockLlm`] - scripted replies for tests
//!
//! Both implement the [`Llm`] trait, which is what the agents depend on.

pub mod error;
pub mod llm;
pub mod mock;
#[cfg(feature = "ollama")]
pub mod ollama;

pub use error::{ModelError, Result};
pub use llm::{GenerateConfig, Llm, LlmRequest, LlmResponse, Message, Role};
pub use mock::MockLlm;
#[cfg(feature = "ollama")]
pub use ollama::OllamaClient;
