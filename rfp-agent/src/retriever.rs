//! The retriever agent: query → top-K chunks.

use std::sync::Arc;

use rfp_rag::{RagPipeline, SearchResult};
use tracing::{error, info};

use crate::error::{AgentError, Result};

pub const RETRIEVER_AGENT: &str = "Retriever Agent";

/// Chunks retrieved for one query.
#[derive(Debug, Clone)]
pub struct RetrievalResult {
    pub query: String,
    /// Descending by score, never more than the requested K.
    pub results: Vec<SearchResult>,
    /// Chunk texts joined by newlines, in result order.
    pub context: String,
}

impl RetrievalResult {
    pub fn num_documents(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Fetches the chunks most similar to a query from one collection.
pub struct RetrieverAgent {
    pipeline: Arc<RagPipeline>,
    collection: String,
}

impl RetrieverAgent {
    pub fn new(pipeline: Arc<RagPipeline>, collection: impl Into<String>) -> Self {
        Self { pipeline, collection: collection.into() }
    }

    pub fn pipeline(&self) -> &Arc<RagPipeline> {
        &self.pipeline
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Retrieve up to `top_k` chunks, or the configured K when `None`.
    ///
    /// A blank query fails with [`AgentError::EmptyInput`] before anything
    /// is embedded or searched. A `top_k` of zero is treated as one.
    pub async fn retrieve(&self, query: &str, top_k: Option<usize>) -> Result<RetrievalResult> {
        if query.trim().is_empty() {
            return Err(AgentError::EmptyInput("query".into()));
        }
        let top_k = top_k.unwrap_or(self.pipeline.config().top_k).max(1);

        info!(agent = RETRIEVER_AGENT, collection = %self.collection, top_k, "retrieving documents");

        let results =
            self.pipeline.query_top_k(&self.collection, query, top_k).await.map_err(|e| {
                error!(agent = RETRIEVER_AGENT, error = %e, "retrieval failed");
                AgentError::Retrieval(e)
            })?;

        let context =
            results.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join("\n");

        info!(agent = RETRIEVER_AGENT, num_documents = results.len(), "retrieved documents");

        Ok(RetrievalResult { query: query.to_string(), results, context })
    }
}
