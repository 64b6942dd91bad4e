//! Persistence collaborator traits
//!
//! The engine never owns knowledge base, document or chunk storage. It
//! reads through these narrow traits; all mutation of persisted data
//! happens in the ingestion pipeline, outside this crate.

use std::fmt::Debug;

use async_trait::async_trait;

use super::document::Chunk;
use super::entity::{KnowledgeBase, KnowledgeBaseId, TenantId};
use crate::domain::error::RetrievalError;

/// Read access to knowledge base configuration
#[async_trait]
pub trait KnowledgeBaseRepository: Send + Sync + Debug {
    /// List the knowledge bases of a tenant that are eligible for search:
    /// active, not soft-deleted, and holding at least one COMPLETED
    /// document. An optional workspace scope narrows the listing.
    async fn list_active(
        &self,
        tenant_id: &TenantId,
        workspace_ids: Option<&[String]>,
    ) -> Result<Vec<KnowledgeBase>, RetrievalError>;
}

/// Read access to persisted chunks and their embeddings
///
/// Implementations may return an exact listing of every chunk in the
/// base or an approximate-nearest-neighbor prefilter; either way the
/// ranker scores the returned candidates exactly.
#[async_trait]
pub trait ChunkStore: Send + Sync + Debug {
    /// Fetch candidate chunks for a knowledge base. The query vector and
    /// limit are hints for backends with a vector index; backends
    /// without one may ignore them and return every searchable chunk.
    async fn candidate_chunks(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
        query_vector: Option<&[f32]>,
        limit: Option<usize>,
    ) -> Result<Vec<Chunk>, RetrievalError>;
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Mock repository returning a fixed listing per tenant
    #[derive(Debug, Default)]
    pub struct MockKnowledgeBaseRepository {
        bases: Mutex<HashMap<String, Vec<KnowledgeBase>>>,
    }

    impl MockKnowledgeBaseRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_bases(self, tenant_id: &TenantId, bases: Vec<KnowledgeBase>) -> Self {
            self.bases
                .lock()
                .unwrap()
                .insert(tenant_id.as_str().to_string(), bases);
            self
        }
    }

    #[async_trait]
    impl KnowledgeBaseRepository for MockKnowledgeBaseRepository {
        async fn list_active(
            &self,
            tenant_id: &TenantId,
            _workspace_ids: Option<&[String]>,
        ) -> Result<Vec<KnowledgeBase>, RetrievalError> {
            Ok(self
                .bases
                .lock()
                .unwrap()
                .get(tenant_id.as_str())
                .cloned()
                .unwrap_or_default())
        }
    }

    /// Mock chunk store with fixed chunks or a configured failure per base
    #[derive(Debug, Default)]
    pub struct MockChunkStore {
        chunks: Mutex<HashMap<String, Vec<Chunk>>>,
        failures: Mutex<HashMap<String, String>>,
        provider_failures: Mutex<HashMap<String, (u16, String)>>,
    }

    impl MockChunkStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_chunks(self, knowledge_base_id: &KnowledgeBaseId, chunks: Vec<Chunk>) -> Self {
            self.chunks
                .lock()
                .unwrap()
                .insert(knowledge_base_id.as_str().to_string(), chunks);
            self
        }

        pub fn with_failure(
            self,
            knowledge_base_id: &KnowledgeBaseId,
            message: impl Into<String>,
        ) -> Self {
            self.failures
                .lock()
                .unwrap()
                .insert(knowledge_base_id.as_str().to_string(), message.into());
            self
        }

        /// Fail this base with a provider error, as a vector backend
        /// fronted by a remote service would
        pub fn with_provider_failure(
            self,
            knowledge_base_id: &KnowledgeBaseId,
            status: u16,
            body: impl Into<String>,
        ) -> Self {
            self.provider_failures
                .lock()
                .unwrap()
                .insert(knowledge_base_id.as_str().to_string(), (status, body.into()));
            self
        }
    }

    #[async_trait]
    impl ChunkStore for MockChunkStore {
        async fn candidate_chunks(
            &self,
            knowledge_base_id: &KnowledgeBaseId,
            _query_vector: Option<&[f32]>,
            limit: Option<usize>,
        ) -> Result<Vec<Chunk>, RetrievalError> {
            if let Some(message) = self
                .failures
                .lock()
                .unwrap()
                .get(knowledge_base_id.as_str())
            {
                return Err(RetrievalError::storage(message.clone()));
            }

            if let Some((status, body)) = self
                .provider_failures
                .lock()
                .unwrap()
                .get(knowledge_base_id.as_str())
            {
                return Err(RetrievalError::provider(*status, body.clone()));
            }

            let mut chunks = self
                .chunks
                .lock()
                .unwrap()
                .get(knowledge_base_id.as_str())
                .cloned()
                .unwrap_or_default();

            if let Some(limit) = limit {
                chunks.truncate(limit);
            }

            Ok(chunks)
        }
    }
}
