//! Document and chunk types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::KnowledgeBaseId;

/// Ingestion status of a document
///
/// Only completed documents contribute chunks to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Processing => write!(f, "PROCESSING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// A source document within a knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: Uuid,
    /// Owning knowledge base
    pub knowledge_base_id: KnowledgeBaseId,
    /// Display title, used as the default source label for chunks
    pub title: String,
    /// Ingestion status
    pub status: DocumentStatus,
}

impl Document {
    /// Create a new document in pending state
    pub fn new(knowledge_base_id: KnowledgeBaseId, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            knowledge_base_id,
            title: title.into(),
            status: DocumentStatus::Pending,
        }
    }

    /// Set the ingestion status
    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether chunks of this document may be searched
    pub fn is_searchable(&self) -> bool {
        self.status == DocumentStatus::Completed
    }
}

/// A bounded passage of a source document, the unit of embedding and
/// retrieval
///
/// Every chunk embedded with the same model carries a vector of the same
/// dimensionality; vectors from different models must never be compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier
    pub id: Uuid,
    /// Owning document
    pub document_id: Uuid,
    /// Ordinal position within the document (0-based)
    pub ordinal: usize,
    /// Raw chunk text
    pub text: String,
    /// Token-count estimate for this chunk
    pub token_count: u32,
    /// Precomputed embedding vector
    pub embedding: Vec<f32>,
    /// Source label for attribution (document title, page)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(
        document_id: Uuid,
        ordinal: usize,
        text: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        let text = text.into();
        let token_count = estimate_tokens(&text);

        Self {
            id: Uuid::new_v4(),
            document_id,
            ordinal,
            text,
            token_count,
            embedding,
            source: None,
        }
    }

    /// Set the token count reported by the embedding provider
    pub fn with_token_count(mut self, token_count: u32) -> Self {
        self.token_count = token_count;
        self
    }

    /// Set the source label
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the embedding dimensionality
    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }
}

/// Rough token estimate when the provider reports no per-input usage.
///
/// Four characters per token is the usual approximation for the models
/// this engine targets.
pub fn estimate_tokens(text: &str) -> u32 {
    text.len().div_ceil(4) as u32
}
