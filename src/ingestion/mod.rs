//! Document ingestion: source adapters and the sliding-window chunker

pub mod adapters;
pub mod chunker;

pub use adapters::{SourceAdapter, SUPPORTED_EXTENSIONS};
pub use chunker::TextChunker;
