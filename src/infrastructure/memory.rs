//! In-memory persistence collaborators for development and testing

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::knowledge_base::{
    Chunk, ChunkStore, Document, KnowledgeBase, KnowledgeBaseId, KnowledgeBaseRepository, TenantId,
};
use crate::domain::RetrievalError;

/// In-memory knowledge base repository
///
/// Holds bases and their documents so the `list_active` contract - only
/// active, non-deleted bases with at least one COMPLETED document - is
/// enforced the same way a relational backend would.
#[derive(Debug, Default)]
pub struct InMemoryKnowledgeBaseRepository {
    bases: Arc<RwLock<Vec<KnowledgeBase>>>,
    documents: Arc<RwLock<Vec<Document>>>,
}

impl InMemoryKnowledgeBaseRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a knowledge base
    pub async fn add_base(&self, base: KnowledgeBase) {
        self.bases.write().await.push(base);
    }

    /// Register a document
    pub async fn add_document(&self, document: Document) {
        self.documents.write().await.push(document);
    }
}

#[async_trait]
impl KnowledgeBaseRepository for InMemoryKnowledgeBaseRepository {
    async fn list_active(
        &self,
        tenant_id: &TenantId,
        workspace_ids: Option<&[String]>,
    ) -> Result<Vec<KnowledgeBase>, RetrievalError> {
        let bases = self.bases.read().await;
        let documents = self.documents.read().await;

        let result = bases
            .iter()
            .filter(|base| base.tenant_id() == tenant_id)
            .filter(|base| base.is_searchable())
            .filter(|base| match workspace_ids {
                Some(ids) => base
                    .workspace_id()
                    .is_some_and(|ws| ids.iter().any(|id| id == ws)),
                None => true,
            })
            .filter(|base| {
                documents
                    .iter()
                    .any(|doc| doc.knowledge_base_id == *base.id() && doc.is_searchable())
            })
            .cloned()
            .collect();

        Ok(result)
    }
}

/// In-memory chunk store
///
/// Chunks are grouped by owning document; candidate retrieval returns
/// every chunk of the base's COMPLETED documents (exact search, no
/// prefilter), which is what small deployments run with.
#[derive(Debug, Default)]
pub struct InMemoryChunkStore {
    documents: Arc<RwLock<Vec<Document>>>,
    chunks: Arc<RwLock<HashMap<Uuid, Vec<Chunk>>>>,
}

impl InMemoryChunkStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document
    pub async fn add_document(&self, document: Document) {
        self.documents.write().await.push(document);
    }

    /// Store chunks for a document
    pub async fn add_chunks(&self, document_id: Uuid, chunks: Vec<Chunk>) {
        self.chunks
            .write()
            .await
            .entry(document_id)
            .or_default()
            .extend(chunks);
    }

    /// Total number of stored chunks
    pub async fn chunk_count(&self) -> usize {
        self.chunks.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl ChunkStore for InMemoryChunkStore {
    async fn candidate_chunks(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
        _query_vector: Option<&[f32]>,
        limit: Option<usize>,
    ) -> Result<Vec<Chunk>, RetrievalError> {
        let documents = self.documents.read().await;
        let chunks = self.chunks.read().await;

        let mut candidates: Vec<Chunk> = documents
            .iter()
            .filter(|doc| doc.knowledge_base_id == *knowledge_base_id && doc.is_searchable())
            .flat_map(|doc| chunks.get(&doc.id).cloned().unwrap_or_default())
            .collect();

        if let Some(limit) = limit {
            candidates.truncate(limit);
        }

        Ok(candidates)
    }
}
