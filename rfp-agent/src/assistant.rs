//! The orchestrator that sequences retrieval, editing, and feedback.
//!
//! Each call is a fresh entry point. The conceptual flow is
//!
//! ```text
//! Idle → Retrieved → Suggested → AwaitingFeedback
//!                                 ├─ accept → Idle
//!                                 ├─ edit   → Idle
//!                                 └─ reject → Revised → AwaitingFeedback
//! ```
//!
//! but nothing is remembered between calls: the caller sends back the
//! suggestion and context with each feedback request, and every outcome
//! reports the state the request ended in.

use std::collections::BTreeMap;

use rfp_rag::{Document, RagPipeline};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::editor::{EDITOR_AGENT, EditMode, EditorAgent};
use crate::error::{AgentError, Result};
use crate::feedback::{FeedbackAction, FeedbackRecord};
use crate::retriever::{RETRIEVER_AGENT, RetrievalResult, RetrieverAgent};
use crate::suggestion::{Suggestion, SuggestionOrigin};

/// Where a request left the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantState {
    Idle,
    Retrieved,
    Suggested,
    AwaitingFeedback,
    Revised,
}

impl AssistantState {
    /// Apply a feedback action to a state awaiting feedback.
    pub fn on_feedback(self, action: FeedbackAction) -> AssistantState {
        match (self, action) {
            (AssistantState::AwaitingFeedback, FeedbackAction::Reject) => AssistantState::Revised,
            (AssistantState::AwaitingFeedback, _) => AssistantState::Idle,
            (other, _) => other,
        }
    }

    /// A revision goes straight back to the caller for review.
    pub fn after_revision(self) -> AssistantState {
        match self {
            AssistantState::Revised => AssistantState::AwaitingFeedback,
            other => other,
        }
    }
}

/// Outcome of a single agent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Success,
    NoContext,
}

/// One line of the per-request agent log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStep {
    /// Position in the log, starting at 1.
    pub step: usize,
    /// Name of the agent that acted.
    pub agent: String,
    /// Human-readable description of what it did.
    pub action: String,
    pub status: StepStatus,
    /// State the conversation reached after this step.
    pub state: AssistantState,
}

#[derive(Debug, Default)]
struct AgentLog(Vec<AgentStep>);

impl AgentLog {
    fn record(&mut self, agent: &str, action: &str, status: StepStatus, state: AssistantState) {
        let step = self.0.len() + 1;
        info!(step, agent, action, ?status, ?state, "agent step");
        self.0.push(AgentStep { step, agent: agent.into(), action: action.into(), status, state });
    }
}

/// Result of [`RfpAssistant::ask`].
#[derive(Debug, Clone)]
pub struct AskOutcome {
    pub query: String,
    pub state: AssistantState,
    pub retrieval: RetrievalResult,
    pub suggestion: Suggestion,
    pub agent_log: Vec<AgentStep>,
}

/// Result of [`RfpAssistant::feedback`].
#[derive(Debug, Clone)]
pub struct FeedbackOutcome {
    pub action: FeedbackAction,
    pub state: AssistantState,
    pub suggestion: Suggestion,
    pub agent_log: Vec<AgentStep>,
}

/// Per-document result of an ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestedDocument {
    pub document_id: String,
    pub source: Option<String>,
    pub chunks: usize,
}

/// Everything indexed by one [`RfpAssistant::ingest`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub documents: Vec<IngestedDocument>,
    pub chunks_indexed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "message")]
pub enum ServiceStatus {
    Ok,
    Unavailable(String),
}

impl ServiceStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ServiceStatus::Ok)
    }
}

/// Reachability of the two backing services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHealth {
    pub document_store: ServiceStatus,
    pub generation: ServiceStatus,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        self.document_store.is_ok() && self.generation.is_ok()
    }
}

/// Retriever + editor behind one stateless API.
pub struct RfpAssistant {
    retriever: RetrieverAgent,
    editor: EditorAgent,
}

impl RfpAssistant {
    pub fn new(retriever: RetrieverAgent, editor: EditorAgent) -> Self {
        Self { retriever, editor }
    }

    pub fn retriever(&self) -> &RetrieverAgent {
        &self.retriever
    }

    pub fn editor(&self) -> &EditorAgent {
        &self.editor
    }

    fn pipeline(&self) -> &RagPipeline {
        self.retriever.pipeline()
    }

    /// Retrieve context for `query` and draft a suggestion from it.
    ///
    /// When nothing is retrieved the editor is skipped and a `no_context`
    /// placeholder is returned instead.
    pub async fn ask(&self, query: &str, top_k: Option<usize>) -> Result<AskOutcome> {
        let mut log = AgentLog::default();

        let retrieval = self.retriever.retrieve(query, top_k).await?;
        log.record(
            RETRIEVER_AGENT,
            "Document retrieval",
            StepStatus::Success,
            AssistantState::Retrieved,
        );

        if retrieval.is_empty() {
            warn!(query, "no documents retrieved; skipping editor");
            log.record(
                EDITOR_AGENT,
                "Content analysis and improvement",
                StepStatus::NoContext,
                AssistantState::Idle,
            );
            return Ok(AskOutcome {
                query: query.to_string(),
                state: AssistantState::Idle,
                retrieval,
                suggestion: Suggestion::no_context(),
                agent_log: log.0,
            });
        }

        let suggestion = self.editor.edit(query, &retrieval.context, EditMode::Initial).await?;
        log.record(
            EDITOR_AGENT,
            "Content analysis and improvement",
            StepStatus::Success,
            AssistantState::Suggested,
        );

        Ok(AskOutcome {
            query: query.to_string(),
            state: AssistantState::AwaitingFeedback,
            retrieval,
            suggestion,
            agent_log: log.0,
        })
    }

    /// React to the user's verdict on a previous suggestion.
    pub async fn feedback(&self, record: FeedbackRecord) -> Result<FeedbackOutcome> {
        let mut log = AgentLog::default();
        let state = AssistantState::AwaitingFeedback.on_feedback(record.action);

        let suggestion = match record.action {
            FeedbackAction::Accept => {
                if record.suggestion.trim().is_empty() {
                    return Err(AgentError::EmptyInput("suggestion".into()));
                }
                log.record(EDITOR_AGENT, "Suggestion accepted", StepStatus::Success, state);
                Suggestion::new(record.suggestion, SuggestionOrigin::Accepted)
            }
            FeedbackAction::Edit => {
                let text = record.edit_text.unwrap_or_default();
                let mode = EditMode::ManualEdit { text };
                let suggestion = self.editor.edit(&record.query, &record.context, mode).await?;
                log.record(EDITOR_AGENT, "Manual edit applied", StepStatus::Success, state);
                suggestion
            }
            FeedbackAction::Reject => {
                let mode = EditMode::Rephrase {
                    previous: record.suggestion,
                    critique: record.critique,
                };
                let suggestion = self.editor.edit(&record.query, &record.context, mode).await?;
                log.record(EDITOR_AGENT, "Feedback-based revision", StepStatus::Success, state);
                suggestion
            }
        };
        let state = state.after_revision();

        info!(action = record.action.as_str(), ?state, "feedback handled");
        Ok(FeedbackOutcome { action: record.action, state, suggestion, agent_log: log.0 })
    }

    /// Plain retrieval-augmented answer with no best-practice framing.
    pub async fn answer(&self, query: &str) -> Result<String> {
        let retrieval = self.retriever.retrieve(query, None).await?;
        self.editor.answer(query, &retrieval.context).await
    }

    /// Chunk, embed, and store `documents` in the assistant's collection.
    pub async fn ingest(&self, documents: &[Document]) -> Result<IngestSummary> {
        if documents.is_empty() || documents.iter().all(|d| d.text.trim().is_empty()) {
            return Err(AgentError::EmptyInput("documents".into()));
        }

        let chunks = self.pipeline().ingest_batch(self.retriever.collection(), documents).await?;

        let mut per_document: BTreeMap<&str, usize> = BTreeMap::new();
        for chunk in &chunks {
            *per_document.entry(chunk.document_id.as_str()).or_default() += 1;
        }

        let documents = documents
            .iter()
            .map(|d| IngestedDocument {
                document_id: d.id.clone(),
                source: d.metadata.get(rfp_rag::document::SOURCE_KEY).cloned(),
                chunks: per_document.get(d.id.as_str()).copied().unwrap_or(0),
            })
            .collect();

        info!(collection = self.retriever.collection(), chunks = chunks.len(), "ingest complete");
        Ok(IngestSummary { documents, chunks_indexed: chunks.len() })
    }

    /// Probe the document store and the generation service independently.
    pub async fn health(&self) -> ServiceHealth {
        let document_store = match self.pipeline().health_check().await {
            Ok(()) => ServiceStatus::Ok,
            Err(e) => ServiceStatus::Unavailable(e.to_string()),
        };
        let generation = match self.editor.llm().health_check().await {
            Ok(()) => ServiceStatus::Ok,
            Err(e) => ServiceStatus::Unavailable(e.to_string()),
        };
        ServiceHealth { document_store, generation }
    }
}
