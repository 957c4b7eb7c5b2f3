//! Sliding-window text chunker
//!
//! Splits content records into fixed-size overlapping character windows,
//! tagging each chunk with its zero-based position in the parent record.

use crate::error::{Error, Result};
use crate::types::{Chunk, ContentRecord};

/// Default window size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default overlap between consecutive windows
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Character-window chunker with configurable size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl TextChunker {
    /// Create a chunker, rejecting configurations where the window cannot
    /// advance (`chunk_overlap >= chunk_size` would loop forever).
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Configuration(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::Configuration(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Split records into chunks, in record order
    pub fn split(&self, records: Vec<ContentRecord>) -> Vec<Chunk> {
        records
            .into_iter()
            .flat_map(|record| self.split_record(record))
            .collect()
    }

    fn split_record(&self, record: ContentRecord) -> Vec<Chunk> {
        let chars: Vec<char> = record.text.chars().collect();
        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            let trimmed = window.trim();
            if !trimmed.is_empty() {
                chunks.push(Chunk {
                    text: trimmed.to_string(),
                    metadata: record.metadata.for_chunk(chunks.len()),
                });
            }
            start += step;
        }

        chunks
    }
}
