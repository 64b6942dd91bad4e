//! ChatKB Retrieval
//!
//! Knowledge base semantic retrieval engine for multi-tenant chatbot
//! operations:
//! - Chunking and batch embedding of ingested documents
//! - Cosine-ranked search over per-tenant knowledge bases
//! - Multi-base fan-out with global re-ranking
//! - Bounded context assembly for prompt injection
//! - Heuristic query gating to skip retrieval for small talk
//!
//! The crate is a library invoked in-process by a conversation-handling
//! service; persistence and the LLM completion call live behind
//! collaborator traits.

pub mod domain;
pub mod infrastructure;

pub use domain::{
    build_context, cosine_similarity, euclidean_distance, rank, Chunk, ChunkStore, ContextFormat,
    ContextOptions, Document, DocumentStatus, EmbeddingConfig, EmbeddingProvider, EmbeddingResult,
    KnowledgeBase, KnowledgeBaseId, KnowledgeBaseRepository, RankOptions, RetrievalError,
    SearchResult, SimilarityMetric, TenantId,
};
pub use infrastructure::services::{
    build_prompt_with_context, should_search_knowledge_base, FanOutFailurePolicy,
    GetContextOptions, IngestionService, KnowledgeContextResult, PrepareChunksRequest,
    PromptContextOptions, RetrievalService,
};
