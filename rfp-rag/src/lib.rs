//! # rfp-rag
//!
//! Document ingestion and vector retrieval for the RFP assistant.
//!
//! Uploaded files are turned into text ([`extract`]), split into chunks
//! ([`chunking`]), embedded ([`EmbeddingProvider`]) and stored in a
//! [`VectorStore`]. [`RagPipeline`] ties these together for both the ingest
//! path and the query path.
//!
//! ## Features
//!
//! - `ollama`: [`ollama::OllamaEmbeddingProvider`] over HTTP
//! - `qdrant`: [`qdrant::QdrantVectorStore`] over gRPC
//! - `pdf`: PDF text extraction in [`extract::extract_text`]

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod inmemory;
pub mod mock;
#[cfg(feature = "ollama")]
pub mod ollama;
pub mod pipeline;
#[cfg(feature = "qdrant")]
pub mod qdrant;
pub mod vectorstore;

pub use chunking::{ChunkStrategy, Chunker, FixedSizeChunker, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use extract::{SourceKind, extract_text};
pub use inmemory::InMemoryVectorStore;
pub use mock::MockEmbeddingProvider;
#[cfg(feature = "ollama")]
pub use ollama::OllamaEmbeddingProvider;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorStore;
pub use vectorstore::VectorStore;
