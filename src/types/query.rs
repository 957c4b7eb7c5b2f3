//! Request shapes consumed from the HTTP layer

use serde::{Deserialize, Serialize};

use super::document::Filter;

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// POST /api/chat
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// The user's question
    pub message: String,
    /// Prior conversation turns, oldest first
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    /// Optional metadata restriction on retrieval
    #[serde(default)]
    pub filter: Filter,
}

/// POST /api/text
#[derive(Debug, Clone, Deserialize)]
pub struct TextIngestRequest {
    pub text: String,
    /// Label recorded as the chunk source; defaults to "text-input"
    #[serde(default)]
    pub source: Option<String>,
}

/// POST /api/website and /api/youtube
#[derive(Debug, Clone, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

/// DELETE /api/documents
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteRequest {
    pub filter: Filter,
}
