//! Embedding result types

use serde::{Deserialize, Serialize};

/// The unit returned by the embedding client: one vector per input text
///
/// Never persisted by the engine; persistence of chunk embeddings is the
/// chunk store's job, triggered by the ingestion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResult {
    /// The embedding vector
    vector: Vec<f32>,
    /// Tokens consumed for this input
    tokens: u32,
    /// Model that produced the vector
    model: String,
}

impl EmbeddingResult {
    /// Create a new embedding result
    pub fn new(vector: Vec<f32>, tokens: u32, model: impl Into<String>) -> Self {
        Self {
            vector,
            tokens,
            model: model.into(),
        }
    }

    /// Get the embedding vector
    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    /// Get the vector dimensionality
    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }

    /// Get the tokens consumed
    pub fn tokens(&self) -> u32 {
        self.tokens
    }

    /// Get the model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Consume and return the vector
    pub fn into_vector(self) -> Vec<f32> {
        self.vector
    }
}

/// Distribute an aggregate token count evenly across `inputs` entries.
///
/// Providers usually report only a total for batch calls; ceiling
/// division charges the remainder rather than dropping it.
pub fn distribute_tokens(total_tokens: u32, inputs: usize) -> u32 {
    if inputs == 0 {
        return 0;
    }
    total_tokens.div_ceil(inputs as u32)
}
