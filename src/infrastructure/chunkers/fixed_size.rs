//! Fixed-size chunking strategy

use crate::domain::ingestion::{helpers, ChunkingConfig, ChunkingStrategy, TextChunk};
use crate::domain::RetrievalError;

/// Chunking strategy that splits text into overlapping fixed-size windows
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    /// Whether to respect word boundaries
    respect_word_boundaries: bool,
}

impl Default for FixedSizeChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedSizeChunker {
    /// Create a new fixed-size chunker
    pub fn new() -> Self {
        Self {
            respect_word_boundaries: true,
        }
    }

    /// Set whether to respect word boundaries
    pub fn with_word_boundaries(mut self, respect: bool) -> Self {
        self.respect_word_boundaries = respect;
        self
    }

    fn find_chunk_end(&self, content: &str, start: usize, target_end: usize) -> usize {
        // The target offset may fall inside a multi-byte character
        let target_end = helpers::floor_char_boundary(content, target_end);

        if !self.respect_word_boundaries || target_end >= content.len() {
            return target_end;
        }

        let boundary = helpers::find_word_boundary_before(content, target_end);

        if boundary <= start {
            helpers::find_word_boundary_after(content, target_end)
        } else {
            boundary
        }
    }
}

impl ChunkingStrategy for FixedSizeChunker {
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

        let mut chunks = Vec::new();
        let mut start = 0;
        let step = config.chunk_size - config.chunk_overlap;

        while start < content.len() {
            let target_end = (start + config.chunk_size).min(content.len());
            let end = self.find_chunk_end(content, start, target_end);

            let chunk_text = content[start..end].trim();

            if !chunk_text.is_empty() && chunk_text.len() >= config.min_chunk_size {
                chunks.push(TextChunk::new(chunk_text, chunks.len(), start, end));
            }

            if end >= content.len() {
                break;
            }

            start = helpers::ceil_char_boundary(content, start + step);

            if start >= end {
                start = end;
            }
        }

        if chunks.is_empty() {
            chunks.push(TextChunk::new(content, 0, 0, content.len()));
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "fixed_size"
    }
}
