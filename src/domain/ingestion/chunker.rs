//! Chunking strategy trait and types

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::error::RetrievalError;

/// Configuration for chunking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
    /// Minimum chunk size; smaller fragments are discarded
    pub min_chunk_size: usize,
}

impl ChunkingConfig {
    /// Create a new chunking configuration
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            min_chunk_size: 50,
        }
    }

    /// Set minimum chunk size
    pub fn with_min_chunk_size(mut self, min_size: usize) -> Self {
        self.min_chunk_size = min_size;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RetrievalError> {
        if self.chunk_size == 0 {
            return Err(RetrievalError::validation("chunk_size must be greater than 0"));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(RetrievalError::validation(
                "chunk_overlap must be less than chunk_size",
            ));
        }

        if self.min_chunk_size > self.chunk_size {
            return Err(RetrievalError::validation(
                "min_chunk_size must be less than or equal to chunk_size",
            ));
        }

        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            min_chunk_size: 50,
        }
    }
}

/// A passage cut from a document before embedding
#[derive(Debug, Clone)]
pub struct TextChunk {
    /// Chunk content
    pub text: String,
    /// Index of this chunk within the document (0-based)
    pub index: usize,
    /// Character offset where this chunk starts
    pub char_start: usize,
    /// Character offset where this chunk ends
    pub char_end: usize,
}

impl TextChunk {
    /// Create a new text chunk
    pub fn new(text: impl Into<String>, index: usize, char_start: usize, char_end: usize) -> Self {
        Self {
            text: text.into(),
            index,
            char_start,
            char_end,
        }
    }

    /// Get the content length
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the chunk is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Trait for chunking strategies
pub trait ChunkingStrategy: Send + Sync + Debug {
    /// Split content into chunks
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<TextChunk>, RetrievalError>;

    /// Get the strategy name
    fn name(&self) -> &'static str;
}

/// Helper functions for chunking
pub mod helpers {
    /// Snap a byte offset back to the nearest char boundary
    pub fn floor_char_boundary(text: &str, pos: usize) -> usize {
        let mut pos = pos.min(text.len());
        while !text.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    /// Snap a byte offset forward to the nearest char boundary
    pub fn ceil_char_boundary(text: &str, pos: usize) -> usize {
        let mut pos = pos.min(text.len());
        while !text.is_char_boundary(pos) {
            pos += 1;
        }
        pos
    }

    /// Find the nearest word boundary before a position
    pub fn find_word_boundary_before(text: &str, pos: usize) -> usize {
        if pos >= text.len() {
            return text.len();
        }

        let bytes = text.as_bytes();
        let mut boundary = pos;

        while boundary > 0 && !bytes[boundary - 1].is_ascii_whitespace() {
            boundary -= 1;
        }

        if boundary == 0 {
            pos
        } else {
            boundary
        }
    }

    /// Find the nearest word boundary after a position
    pub fn find_word_boundary_after(text: &str, pos: usize) -> usize {
        if pos >= text.len() {
            return text.len();
        }

        let bytes = text.as_bytes();
        let mut boundary = pos;

        while boundary < text.len() && !bytes[boundary].is_ascii_whitespace() {
            boundary += 1;
        }

        boundary
    }
}
