//! Ingestion domain - chunking strategies for document preparation

mod chunker;

pub use chunker::{helpers, ChunkingConfig, ChunkingStrategy, TextChunk};
