//! Vector index provider trait
//!
//! The index is opaque storage addressed by one configured collection:
//! upsert-with-metadata, similarity search with filter, native listing
//! (scroll), and filtered delete. The pipeline writes (vector, text,
//! metadata) triples and does not own consistency of the index itself.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{Filter, SourceMetadata};

/// A (vector, text, metadata) triple written to the index
#[derive(Debug, Clone)]
pub struct VectorPoint {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub text: String,
    pub metadata: SourceMetadata,
}

impl VectorPoint {
    /// Payload stored alongside the vector: the chunk text plus the flat
    /// metadata map that filters match against.
    pub fn payload(&self) -> BTreeMap<String, Value> {
        let mut payload = self.metadata.to_map();
        payload.insert("text".to_string(), Value::String(self.text.clone()));
        payload
    }
}

/// A stored point as returned from listing
#[derive(Debug, Clone)]
pub struct StoredPoint {
    pub id: String,
    pub text: String,
    pub metadata: SourceMetadata,
}

/// A search hit with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredPoint {
    pub point: StoredPoint,
    /// Higher is more similar
    pub score: f32,
}

/// Trait for the underlying vector index
///
/// Implementations: [`super::QdrantIndex`] (HTTP) and [`super::MemoryIndex`]
/// (exact scan, used by tests and local development).
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Write points into the collection, creating it on first write.
    ///
    /// No partial-success contract: if any write fails the whole call fails.
    async fn upsert(&self, points: Vec<VectorPoint>) -> Result<()>;

    /// Similarity search, ordered by descending similarity, length <= k.
    ///
    /// Fails with `NotInitialized` when the collection does not exist yet.
    async fn search(&self, vector: &[f32], k: usize, filter: &Filter) -> Result<Vec<ScoredPoint>>;

    /// List stored points matching the filter, up to `limit`, without a query
    /// vector. This is the index's native scan, not an empty-query search.
    async fn scroll(&self, filter: &Filter, limit: usize) -> Result<Vec<StoredPoint>>;

    /// Count stored points matching the filter
    async fn count(&self, filter: &Filter) -> Result<usize>;

    /// Delete all points matching the filter, returning how many were removed.
    ///
    /// Callers guard against empty filters; an empty filter here deletes
    /// everything.
    async fn delete_by_filter(&self, filter: &Filter) -> Result<usize>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Rebuild a stored point from a payload map written by [`VectorPoint::payload`]
pub(crate) fn point_from_payload(
    id: String,
    mut payload: BTreeMap<String, Value>,
) -> Option<StoredPoint> {
    let text = match payload.remove("text") {
        Some(Value::String(text)) => text,
        _ => return None,
    };
    let metadata: SourceMetadata =
        serde_json::from_value(Value::Object(payload.into_iter().collect())).ok()?;
    Some(StoredPoint { id, text, metadata })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceType;

    #[test]
    fn payload_round_trips_through_stored_point() {
        let point = VectorPoint {
            id: Uuid::new_v4(),
            vector: vec![0.1, 0.2],
            text: "hello world".to_string(),
            metadata: SourceMetadata::new("a.pdf", SourceType::Pdf)
                .with_extra("pages", 3)
                .for_chunk(0),
        };

        let payload = point.payload();
        assert_eq!(payload.get("text"), Some(&serde_json::json!("hello world")));

        let stored = point_from_payload(point.id.to_string(), payload).unwrap();
        assert_eq!(stored.text, "hello world");
        assert_eq!(stored.metadata, point.metadata);
    }
}
