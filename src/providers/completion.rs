//! Chat completion provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ChatMessage;

/// Completes a chat given a system prompt and conversation messages
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Produce the assistant's next message
    async fn complete(&self, system_prompt: &str, messages: &[ChatMessage]) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
