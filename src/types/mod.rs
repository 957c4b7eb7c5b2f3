//! Core data model: records, chunks, metadata, filters, and API shapes

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, ContentRecord, Filter, SourceMetadata, SourceType};
pub use query::{ChatMessage, ChatRequest, DeleteRequest, Role, TextIngestRequest, UrlRequest};
pub use response::{
    ChatResponse, DeleteResponse, DocumentEntry, DocumentsResponse, IngestResponse, SourceRef,
    SourceSummary, SourcesResponse,
};
