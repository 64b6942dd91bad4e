//! Embedding provider trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use super::response::EmbeddingResult;
use crate::domain::error::RetrievalError;

/// Trait for embedding providers
///
/// Implementations perform no retries; retry policy belongs to the
/// orchestrating caller.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<EmbeddingResult, RetrievalError>;

    /// Embed a batch of texts; an empty batch returns an empty result
    /// without a network call
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingResult>, RetrievalError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the configured model
    fn model(&self) -> &str;

    /// Get the configured vector dimensionality
    fn dimensions(&self) -> usize;
}
