//! Service layer composing domain algorithms with collaborators

mod ingestion_service;
mod retrieval_service;

pub use ingestion_service::{IngestionService, PrepareChunksRequest};
pub use retrieval_service::{
    build_prompt_with_context, should_search_knowledge_base, FanOutFailurePolicy,
    GetContextOptions, KnowledgeContextResult, PromptContextOptions, RetrievalService,
    DEFAULT_CONTEXT_PREFIX, DEFAULT_CONTEXT_SUFFIX,
};
