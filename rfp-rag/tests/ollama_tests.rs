//! Embedding provider tests against a stub Ollama server.

#![cfg(feature = "ollama")]

use axum::{Json, Router, http::StatusCode, routing::post};
use rfp_rag::{EmbeddingProvider, OllamaEmbeddingProvider, RagError};
use serde_json::{Value, json};

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn echo_embed(Json(body): Json<Value>) -> Json<Value> {
    let inputs = body["input"].as_array().cloned().unwrap_or_default();
    let embeddings: Vec<Vec<f32>> =
        inputs.iter().enumerate().map(|(i, _)| vec![i as f32, 1.0, 0.0]).collect();
    Json(json!({ "model": body["model"], "embeddings": embeddings }))
}

#[tokio::test]
async fn batch_sends_all_inputs_in_one_request() {
    let base = spawn(Router::new().route("/api/embed", post(echo_embed))).await;
    let provider = OllamaEmbeddingProvider::new(base).unwrap().with_model("nomic-embed-text", 3);

    let vectors = provider.embed_batch(&["scope", "budget", "timeline"]).await.unwrap();
    assert_eq!(vectors.len(), 3);
    assert_eq!(vectors[2], vec![2.0, 1.0, 0.0]);
    assert_eq!(provider.dimensions(), 3);
}

#[tokio::test]
async fn single_embed_unwraps_first_vector() {
    let base = spawn(Router::new().route("/api/embed", post(echo_embed))).await;
    let provider = OllamaEmbeddingProvider::new(base).unwrap();

    let vector = provider.embed("vendor duties").await.unwrap();
    assert_eq!(vector, vec![0.0, 1.0, 0.0]);
}

#[tokio::test]
async fn api_error_surfaces_message() {
    let router = Router::new().route(
        "/api/embed",
        post(|| async {
            (StatusCode::NOT_FOUND, Json(json!({ "error": "model \"missing\" not found" })))
        }),
    );
    let base = spawn(router).await;
    let provider = OllamaEmbeddingProvider::new(base).unwrap().with_model("missing", 768);

    let err = provider.embed("anything").await.unwrap_err();
    match err {
        RagError::EmbeddingError { provider, message } => {
            assert_eq!(provider, "ollama");
            assert!(message.contains("not found"), "unexpected message: {message}");
        }
        other => panic!("expected EmbeddingError, got {other:?}"),
    }
}

#[tokio::test]
async fn mismatched_vector_count_is_rejected() {
    let router = Router::new()
        .route("/api/embed", post(|| async { Json(json!({ "embeddings": [[1.0, 0.0]] })) }));
    let base = spawn(router).await;
    let provider = OllamaEmbeddingProvider::new(base).unwrap();

    assert!(provider.embed_batch(&["a", "b"]).await.is_err());
}

#[tokio::test]
async fn unreachable_server_is_a_service_failure() {
    let provider = OllamaEmbeddingProvider::new("http://127.0.0.1:9").unwrap();
    let err = provider.embed("anything").await.unwrap_err();
    assert!(err.is_service_failure());
}

#[test]
fn rejects_non_http_base_url() {
    assert!(OllamaEmbeddingProvider::new("localhost:11434").is_err());
}
