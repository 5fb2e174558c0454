use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Query, State, multipart::MultipartError,
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rfp_agent::{AgentError, EditorAgent, EditorConfig, RetrieverAgent, RfpAssistant};
use rfp_model::{Llm, OllamaClient};
use rfp_rag::{
    Document, EmbeddingProvider, InMemoryVectorStore, OllamaEmbeddingProvider, QdrantVectorStore,
    RagPipeline, SourceKind, VectorStore, extract_text,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::{AppConfig, VectorStoreKind},
    error::ApiError,
    protocol::{
        AnswerResponse, AskQuery, AskRequest, AskResponse, FeedbackRequest, FeedbackResponse,
        HealthResponse, PingResponse, SERVICE_NAME, UploadResponse,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<RfpAssistant>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(assistant: RfpAssistant, config: AppConfig) -> Self {
        Self { assistant: Arc::new(assistant), config: Arc::new(config) }
    }
}

/// Wire the configured backends into an assistant.
///
/// The collection is created up front so queries against a fresh store
/// come back empty instead of failing. An unreachable store only logs a
/// warning here; `/health` reports it.
pub async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(
        OllamaEmbeddingProvider::new(&config.ollama_base_url)?
            .with_model(&config.embedding_model, config.embedding_dimensions)
            .with_timeout(config.request_timeout)?,
    );

    let store: Arc<dyn VectorStore> = match config.vector_store {
        VectorStoreKind::Memory => Arc::new(InMemoryVectorStore::new()),
        VectorStoreKind::Qdrant => Arc::new(
            QdrantVectorStore::new(&config.qdrant_url)
                .with_context(|| format!("invalid QDRANT_URL '{}'", config.qdrant_url))?,
        ),
    };

    let pipeline = RagPipeline::builder()
        .config(config.rag.clone())
        .embedding_provider(embedder)
        .vector_store(store)
        .chunker(config.chunk_strategy.build(config.rag.chunk_size, config.rag.chunk_overlap))
        .build()?;

    if let Err(e) = pipeline.create_collection(&config.collection_name).await {
        warn!(collection = %config.collection_name, error = %e, "could not prepare collection");
    }

    let llm: Arc<dyn Llm> = Arc::new(
        OllamaClient::new(&config.ollama_base_url, &config.ollama_model)?
            .with_timeout(config.request_timeout)?,
    );

    let assistant = RfpAssistant::new(
        RetrieverAgent::new(Arc::new(pipeline), &config.collection_name),
        EditorAgent::new(llm, EditorConfig { temperature: config.temperature }),
    );

    Ok(AppState::new(assistant, config))
}

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let body_limit = DefaultBodyLimit::max(state.config.max_file_size);

    Router::new()
        .route("/upload-pdf", post(upload_pdf))
        .route("/ask", post(ask).get(ask_legacy))
        .route("/feedback", post(feedback))
        .route("/ping", get(ping))
        .route("/health", get(health))
        .route("/config", get(config))
        .with_state(state)
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| "invalid HOST/PORT for rfp-server")?;

    info!(
        model = %config.ollama_model,
        embedding_model = %config.embedding_model,
        vector_store = ?config.vector_store,
        collection = %config.collection_name,
        "starting rfp-server"
    );

    let state = build_state(config).await?;
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("rfp-server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let limit = state.config.max_file_size;
    let upload_error = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::TooLarge { limit }
        } else {
            ApiError::InvalidUpload(e.body_text())
        }
    };

    let mut documents = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| ApiError::InvalidUpload("file part has no filename".into()))?;
        if SourceKind::from_filename(&filename).is_none() {
            return Err(ApiError::UnsupportedFile(filename));
        }

        let bytes = field.bytes().await.map_err(upload_error)?;
        if bytes.is_empty() {
            return Err(AgentError::EmptyInput(format!("uploaded file '{filename}'")).into());
        }

        let name = filename.clone();
        let text = tokio::task::spawn_blocking(move || extract_text(&name, &bytes))
            .await
            .map_err(|e| ApiError::Extraction(format!("{filename}: extractor crashed: {e}")))?
            .map_err(|e| ApiError::Extraction(e.to_string()))?;
        if text.trim().is_empty() {
            return Err(AgentError::EmptyInput(format!("text of '{filename}'")).into());
        }

        info!(filename = %filename, chars = text.chars().count(), "extracted upload");
        documents.push(Document::from_source(Uuid::new_v4().to_string(), filename, text));
    }

    if documents.is_empty() {
        return Err(AgentError::EmptyInput("file".into()).into());
    }

    let summary = state.assistant.ingest(&documents).await?;
    Ok(Json(summary.into()))
}

async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(request) = payload?;
    let outcome = state.assistant.ask(&request.query, request.top_k).await?;
    Ok(Json(outcome.into()))
}

async fn ask_legacy(
    State(state): State<AppState>,
    Query(query): Query<AskQuery>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let response = state.assistant.answer(&query.q).await?;
    Ok(Json(AnswerResponse { response }))
}

async fn feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let Json(request) = payload?;
    let outcome = state.assistant.feedback(request).await?;
    Ok(Json(outcome.into()))
}

async fn ping() -> impl IntoResponse {
    Json(PingResponse { status: "pong".into(), service: SERVICE_NAME.into() })
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let health = state.assistant.health().await;
    let status =
        if health.is_healthy() { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status, Json(HealthResponse::from(health)))
}

async fn config(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.config.view())
}
