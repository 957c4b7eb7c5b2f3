//! rag-notebook: document ingestion and grounded Q&A over a vector index
//!
//! Heterogeneous sources (raw text, PDF/CSV/TXT/DOCX/VTT uploads, web pages,
//! video transcripts) are normalized into tagged content records, chunked,
//! embedded, and written to one vector collection. Questions are answered by
//! an LLM grounded strictly in the retrieved chunks, with source citations.

pub mod config;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::NotebookConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, ContentRecord, Filter, SourceMetadata, SourceType},
    query::{ChatMessage, ChatRequest},
    response::{ChatResponse, SourceRef},
};
