//! Qdrant vector index over its HTTP API
//!
//! Uses the index's native primitives: `points/search` for similarity,
//! `points/scroll` for listing, `points/count` for sizing, and
//! `points/delete` with a filter for scoped deletion.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::QdrantConfig;
use crate::error::{Error, Result};
use crate::types::Filter;

use super::vector_index::{point_from_payload, ScoredPoint, StoredPoint, VectorIndexProvider, VectorPoint};

/// HTTP client for one Qdrant collection
pub struct QdrantIndex {
    http: reqwest::Client,
    base_url: String,
    collection: String,
    api_key: Option<String>,
    // set after the collection is known to exist
    ready: AtomicBool,
}

impl QdrantIndex {
    pub fn new(config: &QdrantConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            api_key: config.api_key.clone(),
            ready: AtomicBool::new(false),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/collections/{}{}", self.base_url, self.collection, path);
        let mut request = self.http.request(method, url);
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }
        request
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: &Value,
    ) -> Result<reqwest::Response> {
        self.request(method, path)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::external("qdrant", e))
    }

    /// Read the response body, mapping a missing collection to `NotInitialized`
    async fn parse<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotInitialized);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::ExternalService {
                service: "qdrant",
                message: format!("HTTP {status}: {detail}"),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| Error::external("qdrant", e))
    }

    /// Create the collection on first write if it does not exist yet
    async fn ensure_collection(&self, vector_size: usize) -> Result<()> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }

        let exists = self
            .request(Method::GET, "")
            .send()
            .await
            .map_err(|e| Error::external("qdrant", e))?
            .status()
            .is_success();

        if !exists {
            tracing::info!(collection = %self.collection, "creating vector collection");
            let body = json!({
                "vectors": { "size": vector_size, "distance": "Cosine" }
            });
            let response = self.send(Method::PUT, "", &body).await?;
            let status = response.status();
            // A concurrent writer may have created it in the meantime
            if !status.is_success() && status != StatusCode::CONFLICT {
                let detail = response.text().await.unwrap_or_default();
                return Err(Error::ExternalService {
                    service: "qdrant",
                    message: format!("failed to create collection: HTTP {status}: {detail}"),
                });
            }
        }

        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    fn filter_clause(filter: &Filter) -> Value {
        let must: Vec<Value> = filter
            .0
            .iter()
            .map(|(key, value)| json!({ "key": key, "match": { "value": value } }))
            .collect();
        json!({ "must": must })
    }
}

#[derive(Deserialize)]
struct SearchEnvelope {
    result: Vec<RawScoredPoint>,
}

#[derive(Deserialize)]
struct RawScoredPoint {
    id: Value,
    score: f32,
    payload: Option<BTreeMap<String, Value>>,
}

#[derive(Deserialize)]
struct ScrollEnvelope {
    result: ScrollResult,
}

#[derive(Deserialize)]
struct ScrollResult {
    points: Vec<RawStoredPoint>,
}

#[derive(Deserialize)]
struct RawStoredPoint {
    id: Value,
    payload: Option<BTreeMap<String, Value>>,
}

#[derive(Deserialize)]
struct CountEnvelope {
    result: CountResult,
}

#[derive(Deserialize)]
struct CountResult {
    count: usize,
}

fn id_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl VectorIndexProvider for QdrantIndex {
    async fn upsert(&self, points: Vec<VectorPoint>) -> Result<()> {
        let Some(first) = points.first() else {
            return Ok(());
        };
        self.ensure_collection(first.vector.len()).await?;

        let wire_points: Vec<Value> = points
            .iter()
            .map(|p| {
                json!({
                    "id": p.id.to_string(),
                    "vector": p.vector,
                    "payload": p.payload(),
                })
            })
            .collect();

        let response = self
            .send(Method::PUT, "/points?wait=true", &json!({ "points": wire_points }))
            .await?;
        Self::parse::<Value>(response).await?;

        tracing::debug!(count = points.len(), collection = %self.collection, "upserted points");
        Ok(())
    }

    async fn search(&self, vector: &[f32], k: usize, filter: &Filter) -> Result<Vec<ScoredPoint>> {
        let mut body = json!({
            "vector": vector,
            "limit": k,
            "with_payload": true,
        });
        if !filter.is_empty() {
            body["filter"] = Self::filter_clause(filter);
        }

        let response = self.send(Method::POST, "/points/search", &body).await?;
        let envelope: SearchEnvelope = Self::parse(response).await?;

        Ok(envelope
            .result
            .into_iter()
            .filter_map(|raw| {
                let payload = raw.payload?;
                let point = point_from_payload(id_string(&raw.id), payload)?;
                Some(ScoredPoint {
                    point,
                    score: raw.score,
                })
            })
            .collect())
    }

    async fn scroll(&self, filter: &Filter, limit: usize) -> Result<Vec<StoredPoint>> {
        let mut body = json!({
            "limit": limit,
            "with_payload": true,
        });
        if !filter.is_empty() {
            body["filter"] = Self::filter_clause(filter);
        }

        let response = self.send(Method::POST, "/points/scroll", &body).await?;
        let envelope: ScrollEnvelope = Self::parse(response).await?;

        Ok(envelope
            .result
            .points
            .into_iter()
            .filter_map(|raw| point_from_payload(id_string(&raw.id), raw.payload?))
            .collect())
    }

    async fn count(&self, filter: &Filter) -> Result<usize> {
        let mut body = json!({ "exact": true });
        if !filter.is_empty() {
            body["filter"] = Self::filter_clause(filter);
        }

        let response = self.send(Method::POST, "/points/count", &body).await?;
        let envelope: CountEnvelope = Self::parse(response).await?;
        Ok(envelope.result.count)
    }

    async fn delete_by_filter(&self, filter: &Filter) -> Result<usize> {
        // The delete API does not report how many points matched, so count
        // first. A concurrent insert in this window may be missed; the index
        // is the source of truth and the next listing reflects it.
        let matched = self.count(filter).await?;
        if matched == 0 {
            return Ok(0);
        }

        let body = json!({ "filter": Self::filter_clause(filter) });
        let response = self.send(Method::POST, "/points/delete?wait=true", &body).await?;
        Self::parse::<Value>(response).await?;

        tracing::info!(deleted = matched, collection = %self.collection, "deleted points by filter");
        Ok(matched)
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_clause_is_conjunctive_exact_match() {
        let filter = Filter::new().with("type", "pdf").with("source", "a.pdf");
        let clause = QdrantIndex::filter_clause(&filter);

        let must = clause["must"].as_array().unwrap();
        assert_eq!(must.len(), 2);
        assert!(must.contains(&json!({ "key": "type", "match": { "value": "pdf" } })));
        assert!(must.contains(&json!({ "key": "source", "match": { "value": "a.pdf" } })));
    }

    #[test]
    fn numeric_ids_are_stringified() {
        assert_eq!(id_string(&json!(42)), "42");
        assert_eq!(id_string(&json!("abc")), "abc");
    }
}
