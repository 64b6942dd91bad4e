//! Chunking strategy implementations

mod fixed_size;
mod paragraph;

pub use fixed_size::FixedSizeChunker;
pub use paragraph::ParagraphChunker;
