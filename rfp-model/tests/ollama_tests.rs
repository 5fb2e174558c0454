//! Chat client tests against a stub Ollama server.

#![cfg(feature = "ollama")]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use rfp_model::{Llm, LlmRequest, ModelError, OllamaClient};
use serde_json::{Value, json};

type Captured = Arc<Mutex<Vec<Value>>>;

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn chat(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
    captured.lock().unwrap().push(body);
    Json(json!({
        "model": "qwen3:0.6b",
        "message": { "role": "assistant", "content": "---IMPROVED CONTENT---\nClear scope." },
        "done": true
    }))
}

fn stub_router(captured: Captured) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/tags", get(|| async { Json(json!({ "models": [] })) }))
        .with_state(captured)
}

#[tokio::test]
async fn generate_posts_non_streaming_chat_with_temperature() {
    let captured: Captured = Arc::default();
    let base = spawn(stub_router(captured.clone())).await;
    let client = OllamaClient::new(base, "qwen3:0.6b").unwrap();

    let reply =
        client.generate(LlmRequest::prompt("Improve this").with_temperature(0.1)).await.unwrap();
    assert_eq!(reply.content, "---IMPROVED CONTENT---\nClear scope.");
    assert_eq!(reply.model, "qwen3:0.6b");

    let bodies = captured.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["model"], "qwen3:0.6b");
    assert_eq!(bodies[0]["stream"], false);
    assert_eq!(bodies[0]["messages"][0]["content"], "Improve this");
    assert!(bodies[0]["options"]["temperature"].is_number());
}

#[tokio::test]
async fn health_check_uses_tags_endpoint() {
    let base = spawn(stub_router(Arc::default())).await;
    let client = OllamaClient::new(base, "qwen3:0.6b").unwrap();
    assert!(client.health_check().await.is_ok());
}

#[tokio::test]
async fn missing_model_maps_to_api_error() {
    let router = Router::new().route(
        "/api/chat",
        post(|| async {
            (StatusCode::NOT_FOUND, Json(json!({ "error": "model 'llama9' not found" })))
        }),
    );
    let base = spawn(router).await;
    let client = OllamaClient::new(base, "llama9").unwrap();

    match client.generate(LlmRequest::prompt("x")).await.unwrap_err() {
        ModelError::Api { status, message, .. } => {
            assert_eq!(status, 404);
            assert!(message.contains("not found"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn reply_without_message_is_invalid() {
    let router = Router::new().route("/api/chat", post(|| async { Json(json!({ "done": true })) }));
    let base = spawn(router).await;
    let client = OllamaClient::new(base, "qwen3:0.6b").unwrap();

    let err = client.generate(LlmRequest::prompt("x")).await.unwrap_err();
    assert!(matches!(err, ModelError::InvalidResponse(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_connection_error() {
    let client = OllamaClient::new("http://127.0.0.1:9", "qwen3:0.6b").unwrap();
    let err = client.generate(LlmRequest::prompt("x")).await.unwrap_err();
    assert!(err.is_connection());
    assert!(client.health_check().await.unwrap_err().is_connection());
}
