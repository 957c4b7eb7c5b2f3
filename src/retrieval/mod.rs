//! Read path: similarity search, source listing, and scoped deletion

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, ScoredPoint, StoredPoint, VectorIndexProvider};
use crate::types::{DocumentEntry, DocumentsResponse, Filter, SourceSummary, SourcesResponse};

/// Query-side gateway over the vector index
pub struct RetrievalGateway {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    list_limit: usize,
    preview_chars: usize,
}

impl RetrievalGateway {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        list_limit: usize,
        preview_chars: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            list_limit,
            preview_chars,
        }
    }

    /// Embed the query and return the top `k` hits matching the filter,
    /// ordered by descending similarity.
    ///
    /// An empty result against a populated index is a valid answer (the
    /// filter matched nothing); an empty index is `NotInitialized`.
    pub async fn search(&self, query: &str, k: usize, filter: &Filter) -> Result<Vec<ScoredPoint>> {
        let vector = self.embedder.embed(query).await?;
        let hits = self.index.search(&vector, k, filter).await?;

        if hits.is_empty() && self.index.count(&Filter::default()).await? == 0 {
            return Err(Error::NotInitialized);
        }

        tracing::debug!(hits = hits.len(), k, "similarity search");
        Ok(hits)
    }

    /// Stored points for listing; an absent collection lists as empty
    async fn scroll_all(&self) -> Result<Vec<StoredPoint>> {
        match self.index.scroll(&Filter::default(), self.list_limit).await {
            Ok(points) => Ok(points),
            Err(Error::NotInitialized) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// List ingested sources, grouped from the index's stored points.
    ///
    /// A notebook with nothing ingested yet lists as empty rather than
    /// failing; the collection simply does not exist at that point.
    pub async fn list_sources(&self) -> Result<SourcesResponse> {
        let points = self.scroll_all().await?;

        let total_chunks = points.len();
        let mut summaries: Vec<SourceSummary> = Vec::new();
        let mut positions: HashMap<(String, String), usize> = HashMap::new();

        for point in points {
            let key = (
                point.metadata.source.clone(),
                point.metadata.source_type.as_str().to_string(),
            );
            match positions.get(&key) {
                Some(&i) => {
                    summaries[i].chunks += 1;
                    // the first chunk of the source makes the better preview
                    if point.metadata.chunk_index == Some(0) {
                        summaries[i].preview = self.preview(&point.text);
                    }
                }
                None => {
                    positions.insert(key, summaries.len());
                    summaries.push(SourceSummary {
                        source: point.metadata.source.clone(),
                        source_type: point.metadata.source_type,
                        chunks: 1,
                        preview: self.preview(&point.text),
                    });
                }
            }
        }

        Ok(SourcesResponse {
            total_sources: summaries.len(),
            total_chunks,
            sources: summaries,
        })
    }

    /// List every stored chunk grouped by source type, with its index id.
    ///
    /// The raw view behind the sources summary: one entry per chunk, so
    /// callers can address individual points.
    pub async fn list_documents(&self) -> Result<DocumentsResponse> {
        let points = self.scroll_all().await?;

        let mut documents: BTreeMap<String, Vec<DocumentEntry>> = BTreeMap::new();
        for point in points {
            documents
                .entry(point.metadata.source_type.as_str().to_string())
                .or_default()
                .push(DocumentEntry {
                    source: point.metadata.source,
                    content_preview: self.preview(&point.text),
                    id: point.id,
                });
        }

        Ok(DocumentsResponse { documents })
    }

    /// Delete everything matching the filter, returning how many chunks went.
    ///
    /// Refuses an empty filter; wiping the whole notebook must never happen
    /// through a malformed request.
    pub async fn delete_by_filter(&self, filter: &Filter) -> Result<usize> {
        if filter.is_empty() {
            return Err(Error::FilterRequired);
        }
        self.index.delete_by_filter(filter).await
    }

    fn preview(&self, text: &str) -> String {
        let mut preview: String = text.chars().take(self.preview_chars).collect();
        if text.chars().count() > self.preview_chars {
            preview.push_str("...");
        }
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MemoryIndex, VectorPoint};
    use crate::types::{SourceMetadata, SourceType};
    use async_trait::async_trait;
    use uuid::Uuid;

    struct FakeEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn gateway(index: Arc<MemoryIndex>) -> RetrievalGateway {
        RetrievalGateway::new(Arc::new(FakeEmbedder), index, 1000, 10)
    }

    fn point(text: &str, source: &str, ty: SourceType, chunk: usize) -> VectorPoint {
        VectorPoint {
            id: Uuid::new_v4(),
            vector: vec![text.len() as f32, 1.0],
            text: text.to_string(),
            metadata: SourceMetadata::new(source, ty).for_chunk(chunk),
        }
    }

    #[tokio::test]
    async fn search_on_uninitialized_index_fails() {
        let gateway = gateway(Arc::new(MemoryIndex::new()));
        let err = gateway.search("q", 3, &Filter::new()).await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized));
    }

    #[tokio::test]
    async fn filtered_miss_on_populated_index_is_empty_success() {
        let index = Arc::new(MemoryIndex::new());
        index
            .upsert(vec![point("hello", "a.txt", SourceType::TextFile, 0)])
            .await
            .unwrap();

        let gateway = gateway(index);
        let filter = Filter::new().with("type", "pdf");
        let hits = gateway.search("q", 3, &filter).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn sources_group_by_source_and_type() {
        let index = Arc::new(MemoryIndex::new());
        index
            .upsert(vec![
                point("first chunk of the report", "report.pdf", SourceType::Pdf, 0),
                point("second chunk", "report.pdf", SourceType::Pdf, 1),
                point("notes", "notes.txt", SourceType::TextFile, 0),
            ])
            .await
            .unwrap();

        let listing = gateway(index).list_sources().await.unwrap();
        assert_eq!(listing.total_sources, 2);
        assert_eq!(listing.total_chunks, 3);

        let report = &listing.sources[0];
        assert_eq!(report.source, "report.pdf");
        assert_eq!(report.chunks, 2);
        // preview is the first chunk, truncated with an ellipsis
        assert_eq!(report.preview, "first chun...");
    }

    #[tokio::test]
    async fn documents_group_by_type_with_chunk_ids() {
        let index = Arc::new(MemoryIndex::new());
        index
            .upsert(vec![
                point("report chunk one", "report.pdf", SourceType::Pdf, 0),
                point("report chunk two", "report.pdf", SourceType::Pdf, 1),
                point("caption text", "talk.vtt", SourceType::Vtt, 0),
            ])
            .await
            .unwrap();

        let listing = gateway(index).list_documents().await.unwrap();
        assert_eq!(listing.documents.len(), 2);

        let pdfs = &listing.documents["pdf"];
        assert_eq!(pdfs.len(), 2);
        assert_eq!(pdfs[0].source, "report.pdf");
        assert_eq!(pdfs[0].content_preview, "report chu...");
        // every entry carries its index-assigned id
        assert!(listing
            .documents
            .values()
            .flatten()
            .all(|entry| !entry.id.is_empty()));

        let vtts = &listing.documents["vtt"];
        assert_eq!(vtts.len(), 1);
        assert_eq!(vtts[0].source, "talk.vtt");
    }

    #[tokio::test]
    async fn empty_notebook_documents_listing_is_empty() {
        let listing = gateway(Arc::new(MemoryIndex::new()))
            .list_documents()
            .await
            .unwrap();
        assert!(listing.documents.is_empty());
    }

    #[tokio::test]
    async fn empty_notebook_lists_as_empty() {
        let listing = gateway(Arc::new(MemoryIndex::new()))
            .list_sources()
            .await
            .unwrap();
        assert!(listing.sources.is_empty());
        assert_eq!(listing.total_sources, 0);
        assert_eq!(listing.total_chunks, 0);
    }

    #[tokio::test]
    async fn delete_requires_a_filter() {
        let gateway = gateway(Arc::new(MemoryIndex::new()));
        let err = gateway.delete_by_filter(&Filter::new()).await.unwrap_err();
        assert!(matches!(err, Error::FilterRequired));
    }

    #[tokio::test]
    async fn delete_reports_removed_count() {
        let index = Arc::new(MemoryIndex::new());
        index
            .upsert(vec![
                point("one", "a.pdf", SourceType::Pdf, 0),
                point("two", "a.pdf", SourceType::Pdf, 1),
            ])
            .await
            .unwrap();

        let gateway = gateway(index);
        let filter = Filter::new().with("source", "a.pdf");
        assert_eq!(gateway.delete_by_filter(&filter).await.unwrap(), 2);
    }
}
