//! Content records, chunks, and the metadata schema shared by both

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Origin of a piece of ingested content
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    /// Raw text pasted by the user
    Text,
    /// PDF document
    Pdf,
    /// CSV file
    Csv,
    /// Plain text file upload
    TextFile,
    /// Microsoft Word document (.docx)
    Docx,
    /// WebVTT caption file
    Vtt,
    /// Fetched web page
    Website,
    /// Video transcript
    Youtube,
}

impl SourceType {
    /// Stable string tag used in metadata and filters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Csv => "csv",
            Self::TextFile => "text-file",
            Self::Docx => "docx",
            Self::Vtt => "vtt",
            Self::Website => "website",
            Self::Youtube => "youtube",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to every record and chunk
///
/// The `source` and `type` keys are what make later filtering possible and
/// are never optional; adapters add type-specific extras (page count, row
/// count, video id, ...) and the chunker fills in `chunk_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Human-meaningful identifier: filename, URL, or label
    pub source: String,
    /// Fixed type tag for the originating adapter
    #[serde(rename = "type")]
    pub source_type: SourceType,
    /// Zero-based position among the parent record's chunks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
    /// Type-specific extras
    #[serde(flatten)]
    pub extras: BTreeMap<String, Value>,
}

impl SourceMetadata {
    /// Tag content with its source label and type
    pub fn new(source: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            source: source.into(),
            source_type,
            chunk_index: None,
            extras: BTreeMap::new(),
        }
    }

    /// Attach a type-specific extra
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Copy of this metadata for the chunk at the given position
    pub fn for_chunk(&self, index: usize) -> Self {
        let mut metadata = self.clone();
        metadata.chunk_index = Some(index);
        metadata
    }

    /// Flat key/value view, as stored in index payloads and matched by filters
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        }
    }
}

/// Normalized output of a source adapter: plain text plus tagged metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRecord {
    /// Extracted plain-text content, free of adapter-internal artifacts
    pub text: String,
    /// Source identification and type-specific extras
    pub metadata: SourceMetadata,
}

impl ContentRecord {
    pub fn new(text: impl Into<String>, metadata: SourceMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// A bounded, trimmed slice of a record's text, ready for embedding
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Trimmed window text, non-empty
    pub text: String,
    /// Parent record metadata plus `chunk_index`
    pub metadata: SourceMetadata,
}

/// Exact-match metadata predicate
///
/// Keys are ANDed together; an empty filter means no restriction. Keys absent
/// from a chunk's metadata never match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(pub BTreeMap<String, Value>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict by an additional key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Conjunctive exact-equality match against a flat metadata map
    pub fn matches(&self, metadata: &BTreeMap<String, Value>) -> bool {
        self.0.iter().all(|(key, value)| metadata.get(key) == Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_tags_round_trip() {
        for ty in [
            SourceType::Text,
            SourceType::Pdf,
            SourceType::Csv,
            SourceType::TextFile,
            SourceType::Docx,
            SourceType::Vtt,
            SourceType::Website,
            SourceType::Youtube,
        ] {
            let json = serde_json::to_value(ty).unwrap();
            assert_eq!(json, serde_json::json!(ty.as_str()));
            let back: SourceType = serde_json::from_value(json).unwrap();
            assert_eq!(back, ty);
        }
    }

    #[test]
    fn metadata_map_flattens_extras() {
        let metadata = SourceMetadata::new("notes.pdf", SourceType::Pdf)
            .with_extra("pages", 4)
            .for_chunk(2);
        let map = metadata.to_map();

        assert_eq!(map.get("source"), Some(&serde_json::json!("notes.pdf")));
        assert_eq!(map.get("type"), Some(&serde_json::json!("pdf")));
        assert_eq!(map.get("chunk_index"), Some(&serde_json::json!(2)));
        assert_eq!(map.get("pages"), Some(&serde_json::json!(4)));
    }

    #[test]
    fn filter_is_conjunctive_and_exact() {
        let metadata = SourceMetadata::new("a.pdf", SourceType::Pdf).to_map();

        assert!(Filter::new().matches(&metadata));
        assert!(Filter::new().with("type", "pdf").matches(&metadata));
        assert!(!Filter::new().with("type", "vtt").matches(&metadata));
        assert!(!Filter::new()
            .with("type", "pdf")
            .with("source", "b.pdf")
            .matches(&metadata));
        // Keys not present in the metadata never match
        assert!(!Filter::new().with("missing", "x").matches(&metadata));
    }
}
