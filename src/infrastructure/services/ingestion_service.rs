//! Document ingestion service - turns raw text into embedded chunks
//!
//! Parsing/OCR happens upstream; this service receives extracted text,
//! cuts it with the configured chunking strategy and embeds the pieces
//! in one batch. Persisting the produced chunks is the chunk store
//! collaborator's job.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::ingestion::{ChunkingConfig, ChunkingStrategy};
use crate::domain::knowledge_base::Chunk;
use crate::domain::RetrievalError;

/// Request to prepare a document's chunks
#[derive(Debug, Clone)]
pub struct PrepareChunksRequest {
    /// Owning document
    pub document_id: Uuid,
    /// Extracted document text
    pub content: String,
    /// Source label attached to every produced chunk
    pub source: Option<String>,
}

impl PrepareChunksRequest {
    /// Create a new request
    pub fn new(document_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            document_id,
            content: content.into(),
            source: None,
        }
    }

    /// Set the source label
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Ingestion service composing a chunking strategy with the embedding
/// client
pub struct IngestionService {
    chunker: Arc<dyn ChunkingStrategy>,
    embedder: Arc<dyn EmbeddingProvider>,
    chunking_config: ChunkingConfig,
}

impl std::fmt::Debug for IngestionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionService")
            .field("chunker", &self.chunker.name())
            .field("chunking_config", &self.chunking_config)
            .finish()
    }
}

impl IngestionService {
    /// Create a new ingestion service
    pub fn new(chunker: Arc<dyn ChunkingStrategy>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            chunker,
            embedder,
            chunking_config: ChunkingConfig::default(),
        }
    }

    /// Set the chunking configuration
    pub fn with_chunking_config(mut self, config: ChunkingConfig) -> Self {
        self.chunking_config = config;
        self
    }

    /// Chunk and embed a document's text.
    ///
    /// Empty or whitespace-only content yields an empty chunk list with
    /// no embedding call. Every produced chunk carries its ordinal, the
    /// provider-reported token count and the request's source label.
    pub async fn prepare_chunks(
        &self,
        request: PrepareChunksRequest,
    ) -> Result<Vec<Chunk>, RetrievalError> {
        let text_chunks = self
            .chunker
            .chunk(&request.content, &self.chunking_config)?;

        if text_chunks.is_empty() {
            debug!(document_id = %request.document_id, "no chunks produced, skipping embedding");
            return Ok(vec![]);
        }

        let texts: Vec<String> = text_chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != text_chunks.len() {
            return Err(RetrievalError::internal(format!(
                "expected {} embeddings, got {}",
                text_chunks.len(),
                embeddings.len()
            )));
        }

        let expected_dimensions = self.embedder.dimensions();

        let chunks = text_chunks
            .into_iter()
            .zip(embeddings)
            .map(|(text_chunk, embedding)| {
                if embedding.dimensions() != expected_dimensions {
                    return Err(RetrievalError::dimension_mismatch(
                        expected_dimensions,
                        embedding.dimensions(),
                    ));
                }

                let tokens = embedding.tokens();
                let mut chunk = Chunk::new(
                    request.document_id,
                    text_chunk.index,
                    text_chunk.text,
                    embedding.into_vector(),
                )
                .with_token_count(tokens);

                if let Some(source) = &request.source {
                    chunk = chunk.with_source(source);
                }

                Ok(chunk)
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            document_id = %request.document_id,
            chunks = chunks.len(),
            strategy = self.chunker.name(),
            "document prepared for indexing"
        );

        Ok(chunks)
    }
}
