//! Response shapes returned to the HTTP layer

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::document::SourceType;

/// A cited source: the pair shown next to an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub source: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
}

/// Answer plus the sources it was grounded on, in citation order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub sources: Vec<SourceRef>,
}

/// Result of one ingestion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub message: String,
    pub source: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    /// Chunks written to the vector index
    pub chunks: usize,
    /// Transcript segment count, for video ingestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<u64>,
}

/// One ingested source as shown in the notebook listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    /// Number of chunks stored for this source
    pub chunks: usize,
    /// Truncated text of the source's first chunk
    pub preview: String,
}

/// GET /api/sources
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcesResponse {
    pub sources: Vec<SourceSummary>,
    pub total_sources: usize,
    pub total_chunks: usize,
}

/// One stored chunk as listed in the raw documents mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEntry {
    pub source: String,
    /// Truncated chunk text
    pub content_preview: String,
    /// Vector-index-assigned chunk id
    pub id: String,
}

/// GET /api/documents: stored chunks grouped by source type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsResponse {
    pub documents: BTreeMap<String, Vec<DocumentEntry>>,
}

/// DELETE /api/documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub deleted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_responses_use_camel_case_keys() {
        let listing = SourcesResponse {
            sources: Vec::new(),
            total_sources: 0,
            total_chunks: 0,
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert!(json.get("totalSources").is_some());
        assert!(json.get("totalChunks").is_some());

        let entry = DocumentEntry {
            source: "a.pdf".to_string(),
            content_preview: "text...".to_string(),
            id: "chunk-1".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("contentPreview").is_some());
    }
}
