//! Write path: chunk content records, embed them, and upsert into the index

use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;
use crate::ingestion::TextChunker;
use crate::providers::{EmbeddingProvider, VectorIndexProvider, VectorPoint};
use crate::types::{Chunk, ContentRecord};

/// Turns extracted content into indexed vector points
pub struct IndexingGateway {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    chunker: TextChunker,
}

impl IndexingGateway {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        chunker: TextChunker,
    ) -> Self {
        Self {
            embedder,
            index,
            chunker,
        }
    }

    /// Chunk and index records, returning the number of chunks written
    pub async fn index_records(&self, records: Vec<ContentRecord>) -> Result<usize> {
        let chunks = self.chunker.split(records);
        self.index_chunks(chunks).await
    }

    async fn index_chunks(&self, chunks: Vec<Chunk>) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        // Embed concurrently; try_join_all keeps chunk order
        let embeddings = futures::future::try_join_all(
            chunks.iter().map(|chunk| self.embedder.embed(&chunk.text)),
        )
        .await?;

        let points: Vec<VectorPoint> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, vector)| VectorPoint {
                id: Uuid::new_v4(),
                vector,
                text: chunk.text,
                metadata: chunk.metadata,
            })
            .collect();

        let written = points.len();
        self.index.upsert(points).await?;

        tracing::info!(chunks = written, index = self.index.name(), "indexed content");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MemoryIndex;
    use crate::types::{Filter, SourceMetadata, SourceType};
    use async_trait::async_trait;

    struct FakeEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let sum = text.bytes().map(f32::from).sum::<f32>();
            Ok(vec![sum, text.len() as f32, 1.0])
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn gateway(index: Arc<MemoryIndex>) -> IndexingGateway {
        IndexingGateway::new(Arc::new(FakeEmbedder), index, TextChunker::default())
    }

    #[tokio::test]
    async fn records_are_chunked_and_counted() {
        let index = Arc::new(MemoryIndex::new());
        let gateway = gateway(index.clone());

        let record = ContentRecord::new(
            "x".repeat(2500),
            SourceMetadata::new("big.txt", SourceType::TextFile),
        );
        let written = gateway.index_records(vec![record]).await.unwrap();

        assert_eq!(written, 4);
        assert_eq!(index.count(&Filter::default()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn empty_record_list_writes_nothing() {
        let index = Arc::new(MemoryIndex::new());
        let gateway = gateway(index.clone());

        assert_eq!(gateway.index_records(Vec::new()).await.unwrap(), 0);
        // the index stays uninitialized when nothing was written
        assert!(index.count(&Filter::default()).await.is_err());
    }
}
