//! Paragraph-based chunking strategy

use crate::domain::ingestion::{helpers, ChunkingConfig, ChunkingStrategy, TextChunk};
use crate::domain::RetrievalError;

/// Chunking strategy that packs blank-line paragraphs up to the size
/// bound, carrying overlap across chunk boundaries
#[derive(Debug, Clone, Default)]
pub struct ParagraphChunker;

impl ParagraphChunker {
    /// Create a new paragraph chunker
    pub fn new() -> Self {
        Self
    }

    fn split_paragraphs(text: &str) -> Vec<&str> {
        text.split("\n\n")
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect()
    }
}

impl ChunkingStrategy for ParagraphChunker {
    fn chunk(
        &self,
        content: &str,
        config: &ChunkingConfig,
    ) -> Result<Vec<TextChunk>, RetrievalError> {
        config.validate()?;

        let content = content.trim();

        if content.is_empty() {
            return Ok(vec![]);
        }

        if content.len() <= config.chunk_size {
            return Ok(vec![TextChunk::new(content, 0, 0, content.len())]);
        }

        let paragraphs = Self::split_paragraphs(content);

        if paragraphs.is_empty() {
            return Ok(vec![TextChunk::new(content, 0, 0, content.len())]);
        }

        let mut chunks: Vec<TextChunk> = Vec::new();
        let mut current = String::new();
        let mut chunk_start = 0;
        let mut position = 0;

        for paragraph in paragraphs {
            if current.is_empty() {
                current.push_str(paragraph);
                chunk_start = position;
            } else if current.len() + 2 + paragraph.len() <= config.chunk_size {
                current.push_str("\n\n");
                current.push_str(paragraph);
            } else {
                if current.len() >= config.min_chunk_size {
                    let chunk_end = chunk_start + current.len();
                    chunks.push(TextChunk::new(
                        current.clone(),
                        chunks.len(),
                        chunk_start,
                        chunk_end,
                    ));
                }

                if config.chunk_overlap > 0 {
                    // The overlap offset may fall inside a multi-byte character
                    let overlap_start = helpers::floor_char_boundary(
                        &current,
                        current.len().saturating_sub(config.chunk_overlap),
                    );
                    let overlap = current[overlap_start..].to_string();
                    let overlap_len = overlap.len();
                    current = format!("{}\n\n{}", overlap, paragraph);
                    chunk_start = position.saturating_sub(overlap_len);
                } else {
                    current = paragraph.to_string();
                    chunk_start = position;
                }
            }

            position += paragraph.len() + 2;
        }

        if current.len() >= config.min_chunk_size || chunks.is_empty() {
            let chunk_end = chunk_start + current.len();
            chunks.push(TextChunk::new(current, chunks.len(), chunk_start, chunk_end));
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "paragraph"
    }
}
