use rfp_agent::{
    AgentStep, AskOutcome, AssistantState, FeedbackAction, FeedbackOutcome, IngestSummary,
    RetrievalResult, ServiceHealth, ServiceStatus, Suggestion,
};
use serde::{Deserialize, Serialize};

pub use rfp_agent::FeedbackRecord as FeedbackRequest;

pub const SERVICE_NAME: &str = "rfp-assist";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub score: f32,
    pub source: Option<String>,
    pub chunk_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalView {
    pub results: Vec<RetrievedChunk>,
    pub context: String,
    pub num_documents: usize,
}

impl From<RetrievalResult> for RetrievalView {
    fn from(retrieval: RetrievalResult) -> Self {
        let num_documents = retrieval.num_documents();
        let results = retrieval
            .results
            .into_iter()
            .map(|r| RetrievedChunk {
                source: r.chunk.source().map(str::to_owned),
                chunk_index: r.chunk.chunk_index(),
                text: r.chunk.text,
                score: r.score,
            })
            .collect();
        Self { results, context: retrieval.context, num_documents }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub status: String,
    pub query: String,
    pub state: AssistantState,
    pub retrieval: RetrievalView,
    pub suggestion: Suggestion,
    pub agent_log: Vec<AgentStep>,
}

impl From<AskOutcome> for AskResponse {
    fn from(outcome: AskOutcome) -> Self {
        Self {
            status: "success".into(),
            query: outcome.query,
            state: outcome.state,
            retrieval: outcome.retrieval.into(),
            suggestion: outcome.suggestion,
            agent_log: outcome.agent_log,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub status: String,
    pub action: FeedbackAction,
    pub state: AssistantState,
    pub suggestion: Suggestion,
    pub agent_log: Vec<AgentStep>,
}

impl From<FeedbackOutcome> for FeedbackResponse {
    fn from(outcome: FeedbackOutcome) -> Self {
        Self {
            status: "success".into(),
            action: outcome.action,
            state: outcome.state,
            suggestion: outcome.suggestion,
            agent_log: outcome.agent_log,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub document_id: String,
    pub chunks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub files: Vec<UploadedFile>,
    pub chunks_indexed: usize,
}

impl From<IngestSummary> for UploadResponse {
    fn from(summary: IngestSummary) -> Self {
        let files = summary
            .documents
            .into_iter()
            .map(|d| UploadedFile {
                filename: d.source.unwrap_or_default(),
                document_id: d.document_id,
                chunks: d.chunks,
            })
            .collect();
        Self { files, chunks_indexed: summary.chunks_indexed }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub document_store: ServiceStatus,
    pub generation: ServiceStatus,
}

impl From<ServiceHealth> for HealthResponse {
    fn from(health: ServiceHealth) -> Self {
        Self {
            status: if health.is_healthy() { "ok" } else { "degraded" },
            document_store: health.document_store,
            generation: health.generation,
        }
    }
}
