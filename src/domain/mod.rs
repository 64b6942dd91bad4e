//! Domain layer - entities, collaborator traits and pure algorithms

pub mod context;
pub mod embedding;
pub mod error;
pub mod gate;
pub mod ingestion;
pub mod knowledge_base;
pub mod similarity;

pub use context::{build_context, ContextFormat, ContextOptions};
pub use embedding::{EmbeddingConfig, EmbeddingProvider, EmbeddingResult};
pub use error::RetrievalError;
pub use gate::should_search;
pub use knowledge_base::{
    Chunk, ChunkStore, Document, DocumentStatus, KnowledgeBase, KnowledgeBaseId,
    KnowledgeBaseRepository, SearchResult, TenantId,
};
pub use similarity::{cosine_similarity, euclidean_distance, rank, RankOptions, SimilarityMetric};
