//! Startup configuration read from the environment.
//!
//! Every key has a default, so an empty environment yields a working local
//! setup (Ollama on `localhost:11434`, Qdrant on `localhost:6334`). A `.env`
//! file in the working directory is loaded first.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use rfp_rag::{ChunkStrategy, RagConfig, RagError};
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen3:0.6b";
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "rag_collection";
pub const DEFAULT_MAX_FILE_SIZE: usize = 50 * 1024 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid { key: &'static str, value: String, reason: String },

    #[error(transparent)]
    Rag(#[from] RagError),
}

/// Which vector store backs the document collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorStoreKind {
    Qdrant,
    Memory,
}

impl FromStr for VectorStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qdrant" => Ok(VectorStoreKind::Qdrant),
            "memory" | "inmemory" | "in-memory" => Ok(VectorStoreKind::Memory),
            _ => Err("expected 'qdrant' or 'memory'".into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err("expected 'pretty' or 'json'".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    pub format: LogFormat,
}

/// Everything the server needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
    pub temperature: f32,
    pub vector_store: VectorStoreKind,
    pub qdrant_url: String,
    pub collection_name: String,
    pub rag: RagConfig,
    pub chunk_strategy: ChunkStrategy,
    pub max_file_size: usize,
    pub request_timeout: Duration,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.into(),
            ollama_model: DEFAULT_OLLAMA_MODEL.into(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.into(),
            embedding_dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            temperature: DEFAULT_TEMPERATURE,
            vector_store: VectorStoreKind::Qdrant,
            qdrant_url: DEFAULT_QDRANT_URL.into(),
            collection_name: DEFAULT_COLLECTION.into(),
            rag: RagConfig::default(),
            chunk_strategy: ChunkStrategy::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log: LogConfig { level: "info".into(), format: LogFormat::default() },
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);
        let defaults = AppConfig::default();
        let rag_defaults = RagConfig::default();

        let rag = RagConfig::builder()
            .chunk_size(env.parse("CHUNK_SIZE", rag_defaults.chunk_size)?)
            .chunk_overlap(env.parse("CHUNK_OVERLAP", rag_defaults.chunk_overlap)?)
            .top_k(env.parse("TOP_K_RESULTS", rag_defaults.top_k)?)
            .similarity_threshold(
                env.parse("SIMILARITY_THRESHOLD", rag_defaults.similarity_threshold)?,
            )
            .build()?;

        let temperature: f32 = env.parse("TEMPERATURE", defaults.temperature)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Invalid {
                key: "TEMPERATURE",
                value: temperature.to_string(),
                reason: "must be between 0.0 and 2.0".into(),
            });
        }

        let level = env.string("LOG_LEVEL", defaults.log.level);
        if let Err(e) = EnvFilter::try_new(&level) {
            return Err(ConfigError::Invalid {
                key: "LOG_LEVEL",
                value: level,
                reason: e.to_string(),
            });
        }

        Ok(Self {
            host: env.string("HOST", defaults.host),
            port: env.parse("PORT", defaults.port)?,
            ollama_base_url: env.string("OLLAMA_BASE_URL", defaults.ollama_base_url),
            ollama_model: env.string("OLLAMA_MODEL", defaults.ollama_model),
            embedding_model: env.string("EMBEDDING_MODEL", defaults.embedding_model),
            embedding_dimensions: env
                .parse("EMBEDDING_DIMENSIONS", defaults.embedding_dimensions)?,
            temperature,
            vector_store: env.parse("VECTOR_STORE", defaults.vector_store)?,
            qdrant_url: env.string("QDRANT_URL", defaults.qdrant_url),
            collection_name: env.string("COLLECTION_NAME", defaults.collection_name),
            rag,
            chunk_strategy: env.parse("CHUNK_STRATEGY", defaults.chunk_strategy)?,
            max_file_size: env.parse("MAX_FILE_SIZE", defaults.max_file_size)?,
            request_timeout: Duration::from_secs(
                env.parse("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            ),
            log: LogConfig {
                level,
                format: env.parse("LOG_FORMAT", defaults.log.format)?,
            },
        })
    }

    /// The subset exposed by `GET /config`.
    pub fn view(&self) -> ConfigView {
        ConfigView {
            ollama_model: self.ollama_model.clone(),
            embedding_model: self.embedding_model.clone(),
            ollama_base_url: self.ollama_base_url.clone(),
            vector_store: self.vector_store,
            collection_name: self.collection_name.clone(),
            chunk_size: self.rag.chunk_size,
            chunk_overlap: self.rag.chunk_overlap,
            chunk_strategy: self.chunk_strategy,
            top_k_results: self.rag.top_k,
            similarity_threshold: self.rag.similarity_threshold,
            temperature: self.temperature,
        }
    }
}

/// Non-secret settings reported to clients.
#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub ollama_model: String,
    pub embedding_model: String,
    pub ollama_base_url: String,
    pub vector_store: VectorStoreKind,
    pub collection_name: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub chunk_strategy: ChunkStrategy,
    pub top_k_results: usize,
    pub similarity_threshold: f32,
    pub temperature: f32,
}

struct Env<'a, F>(&'a F);

impl<F> Env<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn raw(&self, key: &str) -> Option<String> {
        (self.0)(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }

    fn string(&self, key: &str, default: String) -> String {
        self.raw(key).unwrap_or(default)
    }

    fn parse<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.raw(key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        }
    }
}
