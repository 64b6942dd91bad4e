//! OpenAI-compatible embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::embedding::{distribute_tokens, EmbeddingProvider, EmbeddingResult, ResolvedEmbeddingConfig};
use crate::domain::RetrievalError;
use crate::infrastructure::http::HttpClientTrait;

/// Embedding provider speaking the OpenAI embeddings wire protocol
///
/// Construction requires a fully-resolved configuration; credential and
/// model validation happen during resolution, never here.
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    config: ResolvedEmbeddingConfig,
    auth_header: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    /// Create a new provider from a resolved configuration
    pub fn new(client: C, config: ResolvedEmbeddingConfig) -> Self {
        let auth_header = format!("Bearer {}", config.api_key);

        Self {
            client,
            config,
            auth_header,
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.config.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, input: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "input": input,
            "dimensions": self.config.dimensions,
        })
    }

    async fn request_embeddings(
        &self,
        input: serde_json::Value,
        expected_count: usize,
    ) -> Result<Vec<EmbeddingResult>, RetrievalError> {
        let url = self.embeddings_url();
        let body = self.build_request(input);

        let response = self.client.post_json(&url, self.headers(), &body).await?;

        let response: WireEmbeddingResponse = serde_json::from_value(response).map_err(|e| {
            RetrievalError::internal(format!("failed to parse embedding response: {}", e))
        })?;

        if response.data.len() != expected_count {
            return Err(RetrievalError::internal(format!(
                "provider returned {} embeddings for {} inputs",
                response.data.len(),
                expected_count
            )));
        }

        let tokens_per_input = distribute_tokens(response.usage.total_tokens, expected_count);

        let mut data = response.data;
        data.sort_by_key(|d| d.index);

        data.into_iter()
            .map(|item| {
                if item.embedding.len() != self.config.dimensions {
                    return Err(RetrievalError::dimension_mismatch(
                        self.config.dimensions,
                        item.embedding.len(),
                    ));
                }

                Ok(EmbeddingResult::new(
                    item.embedding,
                    tokens_per_input,
                    self.config.model.clone(),
                ))
            })
            .collect()
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<EmbeddingResult, RetrievalError> {
        if text.is_empty() {
            return Err(RetrievalError::validation("cannot embed empty text"));
        }

        let mut results = self
            .request_embeddings(serde_json::json!(text), 1)
            .await?;

        Ok(results.remove(0))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingResult>, RetrievalError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        if texts.iter().any(|t| t.is_empty()) {
            return Err(RetrievalError::validation("cannot embed empty text"));
        }

        self.request_embeddings(serde_json::json!(texts), texts.len())
            .await
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }
}

// Wire types for the embeddings endpoint

#[derive(Debug, Deserialize)]
struct WireEmbeddingResponse {
    data: Vec<WireEmbeddingData>,
    usage: WireEmbeddingUsage,
}

#[derive(Debug, Deserialize)]
struct WireEmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct WireEmbeddingUsage {
    total_tokens: u32,
}
