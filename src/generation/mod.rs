//! Answer generation: prompt assembly and the chat service

pub mod chat;
pub mod prompt;

pub use chat::ChatService;
pub use prompt::{PromptBuilder, NO_CONTEXT_MESSAGE};
