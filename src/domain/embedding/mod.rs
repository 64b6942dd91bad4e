//! Embedding domain - configuration, provider trait and result types

mod config;
mod provider;
mod response;

pub use config::{
    EmbeddingConfig, EmbeddingConfigOverrides, ResolvedEmbeddingConfig, DEFAULT_EMBEDDING_BASE_URL,
    DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_MODEL,
};
pub use provider::EmbeddingProvider;
pub use response::{distribute_tokens, EmbeddingResult};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
