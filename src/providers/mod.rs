//! Provider abstractions for embeddings, chat completion, and vector storage
//!
//! The pipeline only sees these traits; concrete clients are constructed at
//! process start and injected into the gateways.

pub mod completion;
pub mod embedding;
pub mod memory;
pub mod openai;
pub mod qdrant;
pub mod vector_index;

pub use completion::CompletionProvider;
pub use embedding::EmbeddingProvider;
pub use memory::MemoryIndex;
pub use openai::OpenAiClient;
pub use qdrant::QdrantIndex;
pub use vector_index::{ScoredPoint, StoredPoint, VectorIndexProvider, VectorPoint};
