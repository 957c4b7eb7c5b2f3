//! In-memory vector index with exact cosine scan
//!
//! Backs the test suite and local development runs where no Qdrant server is
//! available. Mirrors the collection lifecycle of the real index: searches
//! before the first upsert fail with `NotInitialized`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::Filter;

use super::vector_index::{ScoredPoint, StoredPoint, VectorIndexProvider, VectorPoint};

struct MemoryPoint {
    id: String,
    vector: Vec<f32>,
    text: String,
    point: VectorPoint,
    metadata_map: BTreeMap<String, Value>,
}

/// Exact-scan vector index held in process memory
#[derive(Default)]
pub struct MemoryIndex {
    // None until the first upsert creates the "collection"
    points: RwLock<Option<Vec<MemoryPoint>>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn stored(point: &MemoryPoint) -> StoredPoint {
        StoredPoint {
            id: point.id.clone(),
            text: point.text.clone(),
            metadata: point.point.metadata.clone(),
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndexProvider for MemoryIndex {
    async fn upsert(&self, points: Vec<VectorPoint>) -> Result<()> {
        let mut guard = self.points.write();
        let stored = guard.get_or_insert_with(Vec::new);
        for point in points {
            stored.push(MemoryPoint {
                id: point.id.to_string(),
                vector: point.vector.clone(),
                text: point.text.clone(),
                metadata_map: point.metadata.to_map(),
                point,
            });
        }
        Ok(())
    }

    async fn search(&self, vector: &[f32], k: usize, filter: &Filter) -> Result<Vec<ScoredPoint>> {
        let guard = self.points.read();
        let points = guard.as_ref().ok_or(Error::NotInitialized)?;

        let mut hits: Vec<ScoredPoint> = points
            .iter()
            .filter(|p| filter.matches(&p.metadata_map))
            .map(|p| ScoredPoint {
                point: Self::stored(p),
                score: cosine_similarity(vector, &p.vector),
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }

    async fn scroll(&self, filter: &Filter, limit: usize) -> Result<Vec<StoredPoint>> {
        let guard = self.points.read();
        let points = guard.as_ref().ok_or(Error::NotInitialized)?;

        Ok(points
            .iter()
            .filter(|p| filter.matches(&p.metadata_map))
            .take(limit)
            .map(Self::stored)
            .collect())
    }

    async fn count(&self, filter: &Filter) -> Result<usize> {
        let guard = self.points.read();
        let points = guard.as_ref().ok_or(Error::NotInitialized)?;

        Ok(points
            .iter()
            .filter(|p| filter.matches(&p.metadata_map))
            .count())
    }

    async fn delete_by_filter(&self, filter: &Filter) -> Result<usize> {
        let mut guard = self.points.write();
        let points = guard.as_mut().ok_or(Error::NotInitialized)?;

        let before = points.len();
        points.retain(|p| !filter.matches(&p.metadata_map));
        Ok(before - points.len())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
