//! Configuration for the RAG notebook
//!
//! Built once at process start (optionally from a TOML file, then environment
//! overrides) and injected into the gateways. Nothing in the pipeline reads
//! the environment on its own.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Chunking parameters for the write path
    pub chunking: ChunkingConfig,
    /// OpenAI-compatible API for embeddings and chat completions
    pub openai: OpenAiConfig,
    /// Qdrant vector index coordinates
    pub qdrant: QdrantConfig,
    /// Ingestion request limits
    pub ingest: IngestLimits,
    /// Retrieval and prompt assembly settings
    pub retrieval: RetrievalConfig,
}

impl NotebookConfig {
    /// Load configuration from an optional TOML file, then apply environment
    /// overrides (`OPENAI_API_KEY`, `QDRANT_URL`, `QDRANT_COLLECTION_NAME`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                toml::from_str(&raw)
                    .map_err(|e| Error::Configuration(format!("invalid config file: {e}")))?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("QDRANT_URL") {
            self.qdrant.url = url;
        }
        if let Ok(name) = std::env::var("QDRANT_COLLECTION_NAME") {
            self.qdrant.collection = name;
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable permissive CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// Sliding-window chunking parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive windows in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// OpenAI-compatible API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key; usually supplied via `OPENAI_API_KEY`
    pub api_key: Option<String>,
    /// Base URL of the API
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Chat completion model name
    pub chat_model: String,
    /// Sampling temperature for completions
    pub temperature: f32,
    /// Maximum completion tokens
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            embed_model: "text-embedding-3-large".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: 60,
        }
    }
}

/// Qdrant coordinates: one named collection holds all chunks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QdrantConfig {
    /// Base URL of the Qdrant server
    pub url: String,
    /// Collection name
    pub collection: String,
    /// Optional API key
    pub api_key: Option<String>,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            collection: "rag-notebook-collection".to_string(),
            api_key: None,
        }
    }
}

/// Ingestion request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestLimits {
    /// Maximum length of a raw text submission, in characters
    pub max_text_chars: usize,
    /// Maximum uploaded file size, in bytes
    pub max_upload_bytes: usize,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_text_chars: 50_000,
            max_upload_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Retrieval and prompt assembly settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per query
    pub top_k: usize,
    /// Maximum points fetched when listing the whole collection
    pub list_limit: usize,
    /// Length of the per-source content preview, in characters
    pub preview_chars: usize,
    /// Conversation turns kept when building the completion prompt
    pub history_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            list_limit: 1000,
            preview_chars: 100,
            history_limit: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_ingestion_contract() {
        let config = NotebookConfig::default();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.ingest.max_text_chars, 50_000);
        assert_eq!(config.ingest.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.history_limit, 6);
    }

    #[test]
    fn load_reads_a_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"[server]\nport = 9000\n\n[retrieval]\ntop_k = 5\n",
        )
        .unwrap();

        let config = NotebookConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.retrieval.top_k, 5);
    }

    #[test]
    fn invalid_toml_is_a_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"not valid toml [[[").unwrap();

        let err = NotebookConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let parsed: NotebookConfig = toml::from_str(
            r#"
            [chunking]
            chunk_size = 500

            [qdrant]
            collection = "test-collection"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.chunking.chunk_size, 500);
        assert_eq!(parsed.chunking.chunk_overlap, 200);
        assert_eq!(parsed.qdrant.collection, "test-collection");
        assert_eq!(parsed.server.port, 8080);
    }
}
