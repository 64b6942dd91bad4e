//! Knowledge base domain - entities, chunks and persistence traits

mod document;
mod entity;
mod repository;
mod validation;

pub use document::{estimate_tokens, Chunk, Document, DocumentStatus};
pub use entity::{KnowledgeBase, KnowledgeBaseId, SearchResult, TenantId};
pub use repository::{ChunkStore, KnowledgeBaseRepository};
pub use validation::{validate_id, IdValidationError, MAX_ID_LENGTH};

#[cfg(test)]
pub use repository::mock::{MockChunkStore, MockKnowledgeBaseRepository};
