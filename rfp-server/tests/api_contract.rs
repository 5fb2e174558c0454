use std::sync::Arc;

use reqwest::{
    StatusCode,
    multipart::{Form, Part},
};
use rfp_agent::{EditorAgent, EditorConfig, RetrieverAgent, RfpAssistant};
use rfp_model::MockLlm;
use rfp_rag::{FixedSizeChunker, InMemoryVectorStore, MockEmbeddingProvider, RagPipeline};
use rfp_server::{
    AppConfig, AppState, app_router,
    config::VectorStoreKind,
    protocol::{AskResponse, FeedbackResponse, UploadResponse},
};
use serde_json::{Value, json};

const FORMATTED_REPLY: &str = "---IMPROVED CONTENT---\nThe vendor shall deliver a clear, \
    measurable migration plan.\n\n---SUGGESTIONS---\n- Added milestones\n\n\
    ---AREAS FOR CLARIFICATION---\n- Budget ceiling";

struct TestServer {
    base: String,
    llm: Arc<MockLlm>,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn spawn_server_with(llm: MockLlm, config: AppConfig) -> TestServer {
    let pipeline = RagPipeline::builder()
        .chunker(Arc::new(FixedSizeChunker::new(config.rag.chunk_size, config.rag.chunk_overlap)))
        .config(config.rag.clone())
        .embedding_provider(Arc::new(MockEmbeddingProvider::new(64)))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .expect("pipeline");
    pipeline.create_collection(&config.collection_name).await.expect("collection");

    let llm = Arc::new(llm);
    let assistant = RfpAssistant::new(
        RetrieverAgent::new(Arc::new(pipeline), &config.collection_name),
        EditorAgent::new(llm.clone(), EditorConfig { temperature: config.temperature }),
    );
    let app = app_router(AppState::new(assistant, config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    TestServer { base: format!("http://{addr}"), llm, client: reqwest::Client::new(), handle }
}

async fn spawn_server(llm: MockLlm) -> TestServer {
    let config = AppConfig { vector_store: VectorStoreKind::Memory, ..AppConfig::default() };
    spawn_server_with(llm, config).await
}

fn rfp_text() -> String {
    [
        "The county invites proposals to migrate its land records system.",
        "Vendor responsibilities include data conversion, staff training, and weekly status reports.",
        "The project timeline is nine months and the budget may not exceed two hundred thousand dollars.",
        "Stakeholders include the recorder's office, title companies, and the public.",
        "Technical requirements include single sign-on, encryption at rest, and an audit trail.",
    ]
    .repeat(4)
    .join(" ")
}

fn upload_form(filename: &str, body: Vec<u8>) -> Form {
    Form::new().part("file", Part::bytes(body).file_name(filename.to_string()))
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn upload(&self, filename: &str, body: Vec<u8>) -> reqwest::Response {
        self.client
            .post(self.url("/upload-pdf"))
            .multipart(upload_form(filename, body))
            .send()
            .await
            .expect("upload response")
    }

    async fn post_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.expect("post response")
    }
}

#[tokio::test]
async fn ping_identifies_service() {
    let server = spawn_server(MockLlm::new("mock")).await;
    let body: Value =
        server.client.get(server.url("/ping")).send().await.unwrap().json().await.unwrap();
    assert_eq!(body, json!({ "status": "pong", "service": "rfp-assist" }));
}

#[tokio::test]
async fn config_reports_effective_settings() {
    let server = spawn_server(MockLlm::new("mock")).await;
    let body: Value =
        server.client.get(server.url("/config")).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["ollama_model"], "qwen3:0.6b");
    assert_eq!(body["embedding_model"], "nomic-embed-text");
    assert_eq!(body["vector_store"], "memory");
    assert_eq!(body["chunk_size"], 500);
    assert_eq!(body["top_k_results"], 3);
}

#[tokio::test]
async fn upload_then_ask_returns_suggestion_with_tags() {
    let server = spawn_server(MockLlm::new("mock").with_reply(FORMATTED_REPLY)).await;
    let text = rfp_text();
    let expected_chunks = text.chars().count().div_ceil(500);

    let upload = server.upload("county-rfp.txt", text.into_bytes()).await;
    assert_eq!(upload.status(), StatusCode::OK);
    let uploaded: UploadResponse = upload.json().await.unwrap();
    assert_eq!(uploaded.chunks_indexed, expected_chunks);
    assert_eq!(uploaded.files[0].filename, "county-rfp.txt");

    let response = server.post_json("/ask", json!({ "query": "vendor responsibilities" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: AskResponse = response.json().await.unwrap();

    assert_eq!(body.status, "success");
    assert!(!body.retrieval.results.is_empty());
    assert!(body.retrieval.results.len() <= 3);
    assert_eq!(body.retrieval.num_documents, body.retrieval.results.len());
    for window in body.retrieval.results.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
    assert_eq!(body.retrieval.results[0].source.as_deref(), Some("county-rfp.txt"));
    assert_eq!(body.suggestion.text, FORMATTED_REPLY);
    assert!(!body.suggestion.applied_practices.is_empty());
    assert_eq!(body.agent_log.len(), 2);
    assert_eq!(server.llm.call_count(), 1);

    let raw: Value = serde_json::to_value(&body).unwrap();
    assert_eq!(raw["state"], "awaiting_feedback");
    assert_eq!(raw["suggestion"]["origin"], "generated");
}

#[tokio::test]
async fn ask_honours_top_k() {
    let server = spawn_server(MockLlm::new("mock").with_reply("Clear scope.")).await;
    server.upload("rfp.txt", rfp_text().into_bytes()).await;

    let body: AskResponse =
        server.post_json("/ask", json!({ "query": "budget", "top_k": 1 })).await.json().await.unwrap();
    assert_eq!(body.retrieval.results.len(), 1);
}

#[tokio::test]
async fn ask_on_empty_store_has_no_context() {
    let server = spawn_server(MockLlm::new("mock")).await;

    let response = server.post_json("/ask", json!({ "query": "timeline" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();

    assert_eq!(body["suggestion"]["text"], "No relevant documents found to analyze.");
    assert_eq!(body["suggestion"]["origin"], "no_context");
    assert_eq!(body["retrieval"]["num_documents"], 0);
    assert_eq!(server.llm.call_count(), 0);
}

#[tokio::test]
async fn blank_query_is_bad_request() {
    let server = spawn_server(MockLlm::new("mock")).await;

    let response = server.post_json("/ask", json!({ "query": "   " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "empty_input");
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn unreachable_model_is_service_unavailable() {
    let server = spawn_server(MockLlm::new("mock").with_connection_error()).await;
    server.upload("rfp.txt", rfp_text().into_bytes()).await;

    let response = server.post_json("/ask", json!({ "query": "scope" })).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "service_unavailable");
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn empty_completion_is_bad_gateway() {
    let server = spawn_server(MockLlm::new("mock").with_reply("   ")).await;
    server.upload("rfp.txt", rfp_text().into_bytes()).await;

    let response = server.post_json("/ask", json!({ "query": "scope" })).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "generation_empty");
}

#[tokio::test]
async fn legacy_ask_returns_plain_answer() {
    let server = spawn_server(MockLlm::new("mock").with_reply("Nine months.")).await;
    server.upload("rfp.txt", rfp_text().into_bytes()).await;

    let response = server
        .client
        .get(server.url("/ask"))
        .query(&[("q", "How long is the project?")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["response"], "Nine months.");

    let prompt = server.llm.requests()[0].user_text();
    assert!(prompt.starts_with("Answer the question using the context below."));
}

#[tokio::test]
async fn feedback_accept_returns_suggestion_unchanged() {
    let server = spawn_server(MockLlm::new("mock")).await;
    let suggestion = "Vendors shall report weekly.\n\nKeep this exactly.";

    let response = server
        .post_json(
            "/feedback",
            json!({ "action": "accept", "query": "q", "suggestion": suggestion, "context": "c" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: FeedbackResponse = response.json().await.unwrap();

    assert_eq!(body.suggestion.text, suggestion);
    assert_eq!(server.llm.call_count(), 0);
    let raw = serde_json::to_value(&body).unwrap();
    assert_eq!(raw["state"], "idle");
    assert_eq!(raw["suggestion"]["origin"], "accepted");
}

#[tokio::test]
async fn feedback_edit_is_verbatim_without_generation() {
    let server = spawn_server(MockLlm::new("mock")).await;

    let body: Value = server
        .post_json(
            "/feedback",
            json!({
                "action": "edit",
                "query": "q",
                "suggestion": "old",
                "context": "c",
                "edit_text": "The vendor shall provide 24/7 support."
            }),
        )
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["suggestion"]["text"], "The vendor shall provide 24/7 support.");
    assert_eq!(body["suggestion"]["origin"], "edited");
    assert_eq!(server.llm.call_count(), 0);
}

#[tokio::test]
async fn feedback_reject_rephrases_once_with_critique() {
    let server = spawn_server(MockLlm::new("mock").with_reply("A measurable scope.")).await;

    let body: Value = server
        .post_json(
            "/feedback",
            json!({
                "action": "reject",
                "query": "scope",
                "suggestion": "Vague scope.",
                "context": "The county invites proposals.",
                "critique": "add concrete deliverables"
            }),
        )
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["suggestion"]["text"], "A measurable scope.");
    assert_eq!(body["suggestion"]["origin"], "revised");
    assert_eq!(body["state"], "awaiting_feedback");
    assert_eq!(body["agent_log"][0]["state"], "revised");
    assert_eq!(server.llm.call_count(), 1);
    assert!(server.llm.requests()[0].user_text().contains("add concrete deliverables"));
}

#[tokio::test]
async fn feedback_edit_with_run_together_headings_is_answered() {
    let server = spawn_server(MockLlm::new("mock")).await;
    let text = "---IMPROVED CONTENT---SUGGESTIONS---\nbody";

    let response = server
        .post_json(
            "/feedback",
            json!({
                "action": "edit",
                "query": "q",
                "suggestion": "---SUGGESTIONS---IMPROVED CONTENT---",
                "context": "c",
                "edit_text": text
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["suggestion"]["text"], text);
}

#[tokio::test]
async fn malformed_json_bodies_get_error_envelope() {
    let server = spawn_server(MockLlm::new("mock")).await;

    for (path, body) in [
        ("/ask", json!({})),
        ("/feedback", json!({ "action": "shrug", "query": "q", "suggestion": "s" })),
    ] {
        let response = server.post_json(path, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "invalid_request");
        assert_eq!(body["retryable"], false);
        assert!(body["message"].as_str().unwrap().contains("invalid request body"));
    }
}

#[tokio::test]
async fn upload_indexes_every_file_part() {
    let server = spawn_server(MockLlm::new("mock")).await;
    let long = "a".repeat(1200);
    let short = "b".repeat(300);

    let form = Form::new()
        .part("file", Part::bytes(long.into_bytes()).file_name("scope.txt"))
        .part("file", Part::bytes(short.into_bytes()).file_name("budget.txt"));
    let response = server
        .client
        .post(server.url("/upload-pdf"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: UploadResponse = response.json().await.unwrap();

    assert_eq!(body.files.len(), 2);
    assert_eq!(body.files[0].filename, "scope.txt");
    assert_eq!(body.files[0].chunks, 3);
    assert_eq!(body.files[1].filename, "budget.txt");
    assert_eq!(body.files[1].chunks, 1);
    assert_ne!(body.files[0].document_id, body.files[1].document_id);
    assert_eq!(body.chunks_indexed, 4);
}

#[tokio::test]
async fn unsupported_upload_is_rejected() {
    let server = spawn_server(MockLlm::new("mock")).await;

    let response = server.upload("scope.docx", b"irrelevant".to_vec()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "unsupported_file");
}

#[tokio::test]
async fn empty_upload_is_empty_input() {
    let server = spawn_server(MockLlm::new("mock")).await;

    let response = server.upload("blank.txt", b"  \n\n ".to_vec()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "empty_input");
}

#[tokio::test]
async fn undecodable_text_is_unprocessable() {
    let server = spawn_server(MockLlm::new("mock")).await;

    let response = server.upload("broken.txt", vec![0xff, 0xfe, 0xfd]).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "extraction_failed");
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let config = AppConfig {
        vector_store: VectorStoreKind::Memory,
        max_file_size: 1024,
        ..AppConfig::default()
    };
    let server = spawn_server_with(MockLlm::new("mock"), config).await;

    let response = server.upload("big.txt", "word ".repeat(2048).into_bytes()).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "file_too_large");
}

#[tokio::test]
async fn health_is_ok_when_both_services_are_up() {
    let server = spawn_server(MockLlm::new("mock")).await;

    let response = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["document_store"]["status"], "ok");
    assert_eq!(body["generation"]["status"], "ok");
}

#[tokio::test]
async fn health_is_degraded_when_generation_is_down() {
    let server = spawn_server(MockLlm::new("mock").unhealthy()).await;

    let response = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["generation"]["status"], "unavailable");
}
