//! Embedding provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into a fixed-length vector
///
/// Assumed deterministic for identical text under a fixed model version; no
/// contract on dimensionality beyond "fixed per model."
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate the embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
