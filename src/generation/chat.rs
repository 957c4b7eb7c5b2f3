//! Retrieval-augmented chat over the indexed notebook

use std::sync::Arc;

use crate::error::Result;
use crate::providers::CompletionProvider;
use crate::retrieval::RetrievalGateway;
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

use super::prompt::{PromptBuilder, NO_CONTEXT_MESSAGE};

/// Answers questions against the index, grounding every reply in retrieval
pub struct ChatService {
    retrieval: Arc<RetrievalGateway>,
    completion: Arc<dyn CompletionProvider>,
    top_k: usize,
    history_limit: usize,
}

impl ChatService {
    pub fn new(
        retrieval: Arc<RetrievalGateway>,
        completion: Arc<dyn CompletionProvider>,
        top_k: usize,
        history_limit: usize,
    ) -> Self {
        Self {
            retrieval,
            completion,
            top_k,
            history_limit,
        }
    }

    /// Retrieve context for the question and generate a grounded answer.
    ///
    /// When the filter matches nothing the canned no-context reply is
    /// returned without calling the model at all.
    pub async fn respond(&self, request: ChatRequest) -> Result<ChatResponse> {
        let hits = self
            .retrieval
            .search(&request.message, self.top_k, &request.filter)
            .await?;

        if hits.is_empty() {
            return Ok(ChatResponse {
                message: NO_CONTEXT_MESSAGE.to_string(),
                sources: Vec::new(),
            });
        }

        let system_prompt = PromptBuilder::build_system_prompt(&hits);
        let sources = PromptBuilder::cited_sources(&hits);

        // Only the most recent turns travel to the model
        let tail = request.history.len().saturating_sub(self.history_limit);
        let mut messages: Vec<ChatMessage> = request.history[tail..].to_vec();
        messages.push(ChatMessage::user(request.message));

        let message = self.completion.complete(&system_prompt, &messages).await?;

        tracing::debug!(sources = sources.len(), "generated grounded answer");
        Ok(ChatResponse { message, sources })
    }
}
