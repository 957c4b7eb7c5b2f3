//! Application state for the notebook server

use std::sync::Arc;

use crate::config::NotebookConfig;
use crate::error::Result;
use crate::generation::ChatService;
use crate::index::IndexingGateway;
use crate::ingestion::{SourceAdapter, TextChunker};
use crate::providers::{
    CompletionProvider, EmbeddingProvider, OpenAiClient, QdrantIndex, VectorIndexProvider,
};
use crate::retrieval::RetrievalGateway;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: NotebookConfig,
    adapter: SourceAdapter,
    indexing: IndexingGateway,
    retrieval: Arc<RetrievalGateway>,
    chat: ChatService,
}

impl AppState {
    /// Wire up the production providers: OpenAI for embeddings and
    /// completions, Qdrant as the vector index.
    pub fn new(config: NotebookConfig) -> Result<Self> {
        let openai = Arc::new(OpenAiClient::new(&config.openai)?);
        let index: Arc<dyn VectorIndexProvider> = Arc::new(QdrantIndex::new(&config.qdrant));

        tracing::info!(
            embed_model = %config.openai.embed_model,
            chat_model = %config.openai.chat_model,
            collection = %config.qdrant.collection,
            "providers initialized"
        );

        Self::with_providers(config, openai.clone(), openai, index)
    }

    /// Wire up with explicit providers; tests inject in-memory fakes here
    pub fn with_providers(
        config: NotebookConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        completion: Arc<dyn CompletionProvider>,
        index: Arc<dyn VectorIndexProvider>,
    ) -> Result<Self> {
        let chunker = TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;
        let indexing = IndexingGateway::new(embedder.clone(), index.clone(), chunker);
        let retrieval = Arc::new(RetrievalGateway::new(
            embedder,
            index,
            config.retrieval.list_limit,
            config.retrieval.preview_chars,
        ));
        let chat = ChatService::new(
            retrieval.clone(),
            completion,
            config.retrieval.top_k,
            config.retrieval.history_limit,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                adapter: SourceAdapter::new(),
                indexing,
                retrieval,
                chat,
            }),
        })
    }

    pub fn config(&self) -> &NotebookConfig {
        &self.inner.config
    }

    pub fn adapter(&self) -> &SourceAdapter {
        &self.inner.adapter
    }

    pub fn indexing(&self) -> &IndexingGateway {
        &self.inner.indexing
    }

    pub fn retrieval(&self) -> &RetrievalGateway {
        &self.inner.retrieval
    }

    pub fn chat(&self) -> &ChatService {
        &self.inner.chat
    }
}
