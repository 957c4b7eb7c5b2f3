//! Grounded prompt assembly from retrieval hits

use crate::providers::ScoredPoint;
use crate::types::SourceRef;

/// Canned reply returned without calling the model when retrieval finds
/// nothing to ground an answer on.
pub const NO_CONTEXT_MESSAGE: &str = "I don't have any relevant information in my knowledge base to answer your question. Please upload some documents or add a website first.";

const INSTRUCTIONS: &str = "You are an AI assistant that helps users by answering questions based on the provided context from uploaded documents and websites.

Instructions:
- Only answer based on the information provided in the context
- If the context doesn't contain relevant information, say so politely
- Cite your sources by mentioning the source name and type
- Be concise but comprehensive in your answers
- If multiple sources contain relevant information, synthesize them appropriately";

/// Builds the system prompt and citation list from retrieval hits
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render hits as numbered context blocks, in retrieval order
    pub fn build_context(hits: &[ScoredPoint]) -> String {
        hits.iter()
            .enumerate()
            .map(|(i, hit)| {
                format!(
                    "Source {} ({} - {}):\n{}",
                    i + 1,
                    hit.point.metadata.source_type,
                    hit.point.metadata.source,
                    hit.point.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Full system prompt: grounding instructions plus the context blocks
    pub fn build_system_prompt(hits: &[ScoredPoint]) -> String {
        format!("{INSTRUCTIONS}\n\nContext:\n{}", Self::build_context(hits))
    }

    /// Cited sources in first-appearance order, deduplicated
    pub fn cited_sources(hits: &[ScoredPoint]) -> Vec<SourceRef> {
        let mut sources: Vec<SourceRef> = Vec::new();
        for hit in hits {
            let source = SourceRef {
                source: hit.point.metadata.source.clone(),
                source_type: hit.point.metadata.source_type,
            };
            if !sources.contains(&source) {
                sources.push(source);
            }
        }
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::StoredPoint;
    use crate::types::{SourceMetadata, SourceType};

    fn hit(text: &str, source: &str, ty: SourceType, score: f32) -> ScoredPoint {
        ScoredPoint {
            point: StoredPoint {
                id: "p".to_string(),
                text: text.to_string(),
                metadata: SourceMetadata::new(source, ty).for_chunk(0),
            },
            score,
        }
    }

    #[test]
    fn context_blocks_are_numbered_and_labeled() {
        let hits = vec![
            hit("first passage", "report.pdf", SourceType::Pdf, 0.9),
            hit("second passage", "https://example.com", SourceType::Website, 0.8),
        ];

        let context = PromptBuilder::build_context(&hits);
        assert_eq!(
            context,
            "Source 1 (pdf - report.pdf):\nfirst passage\n\n\
             Source 2 (website - https://example.com):\nsecond passage"
        );
    }

    #[test]
    fn system_prompt_embeds_the_context() {
        let hits = vec![hit("passage", "a.txt", SourceType::TextFile, 0.5)];
        let prompt = PromptBuilder::build_system_prompt(&hits);

        assert!(prompt.contains("Context:"));
        assert!(prompt.contains("Source 1 (text-file - a.txt):\npassage"));
        assert!(prompt.starts_with("You are an AI assistant"));
    }

    #[test]
    fn cited_sources_dedupe_in_order() {
        let hits = vec![
            hit("a", "report.pdf", SourceType::Pdf, 0.9),
            hit("b", "notes.txt", SourceType::TextFile, 0.8),
            hit("c", "report.pdf", SourceType::Pdf, 0.7),
        ];

        let sources = PromptBuilder::cited_sources(&hits);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].source, "report.pdf");
        assert_eq!(sources[1].source, "notes.txt");
    }
}
