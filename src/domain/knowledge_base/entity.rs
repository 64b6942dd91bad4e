//! Knowledge base entity and search result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_id, IdValidationError};

/// Tenant identifier - alphanumeric plus hyphens/underscores, max 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Create a new TenantId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, IdValidationError> {
        let id = id.into();
        validate_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TenantId {
    type Error = IdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Knowledge base identifier - alphanumeric plus hyphens/underscores, max 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KnowledgeBaseId(String);

impl KnowledgeBaseId {
    /// Create a new KnowledgeBaseId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, IdValidationError> {
        let id = id.into();
        validate_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for KnowledgeBaseId {
    type Error = IdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<KnowledgeBaseId> for String {
    fn from(id: KnowledgeBaseId) -> Self {
        id.0
    }
}

impl std::fmt::Display for KnowledgeBaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Knowledge base entity
///
/// The engine never owns knowledge base storage; this is the read
/// projection returned by the persistence collaborator. A base is
/// eligible for search only while it is active, not soft-deleted, and
/// has at least one completed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Unique identifier
    id: KnowledgeBaseId,
    /// Owning tenant
    tenant_id: TenantId,
    /// Display name
    name: String,
    /// Optional workspace grouping within the tenant
    #[serde(skip_serializing_if = "Option::is_none")]
    workspace_id: Option<String>,
    /// Whether the base is enabled for search
    active: bool,
    /// Soft-deletion timestamp; bases are never hard-removed while
    /// chunks reference them
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl KnowledgeBase {
    /// Create a new knowledge base
    pub fn new(id: KnowledgeBaseId, tenant_id: TenantId, name: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id,
            tenant_id,
            name: name.into(),
            workspace_id: None,
            active: true,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the workspace grouping
    pub fn with_workspace_id(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    /// Get the workspace grouping
    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    /// Set the active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Mark the base as soft-deleted
    pub fn with_deleted_at(mut self, deleted_at: DateTime<Utc>) -> Self {
        self.deleted_at = Some(deleted_at);
        self
    }

    /// Get the identifier
    pub fn id(&self) -> &KnowledgeBaseId {
        &self.id
    }

    /// Get the owning tenant
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Get the display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the base is active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the base is soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether the base may be searched
    pub fn is_searchable(&self) -> bool {
        self.active && self.deleted_at.is_none()
    }

    /// Get the creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the last update timestamp
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// A single ranked retrieval hit
///
/// Produced transiently per query and never persisted. The ordinal of
/// the originating chunk is carried so merged result sets keep the
/// deterministic tie-break when re-sorted globally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifier of the originating chunk
    pub chunk_id: Uuid,
    /// Knowledge base the chunk belongs to
    pub knowledge_base_id: KnowledgeBaseId,
    /// Ordinal position of the chunk within its document
    pub ordinal: usize,
    /// Chunk text
    pub text: String,
    /// Similarity score under the ranking metric
    pub score: f32,
    /// Source label for attribution (document title, page)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SearchResult {
    /// Create a new search result
    pub fn new(
        chunk_id: Uuid,
        knowledge_base_id: KnowledgeBaseId,
        ordinal: usize,
        text: impl Into<String>,
        score: f32,
    ) -> Self {
        Self {
            chunk_id,
            knowledge_base_id,
            ordinal,
            text: text.into(),
            score,
            source: None,
        }
    }

    /// Set the source label
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
