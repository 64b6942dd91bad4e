//! Retrieval orchestrator - resolves knowledge bases, fans out the
//! search and assembles the bounded context string

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::context::{build_context, ContextFormat, ContextOptions, DEFAULT_CONTEXT_LENGTH};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::gate;
use crate::domain::knowledge_base::{
    ChunkStore, KnowledgeBaseId, KnowledgeBaseRepository, SearchResult, TenantId,
};
use crate::domain::similarity::{
    rank, sort_results, RankOptions, DEFAULT_SCORE_THRESHOLD, DEFAULT_TOP_K,
};
use crate::domain::RetrievalError;

/// Default wording placed between the base prompt and the context
pub const DEFAULT_CONTEXT_PREFIX: &str =
    "\n\nUse the following knowledge base content to answer the user's question:\n\n---\n";

/// Default wording placed after the context
pub const DEFAULT_CONTEXT_SUFFIX: &str = "---\n";

/// How a per-base failure during fan-out is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FanOutFailurePolicy {
    /// Log the failing base and treat it as zero results; a partial
    /// context from the healthy bases is still returned
    #[default]
    DegradeToPartial,
    /// Abort the whole request on the first failing base
    Abort,
}

/// Options for a context retrieval call
#[derive(Debug, Clone)]
pub struct GetContextOptions {
    pub tenant_id: TenantId,
    pub query: String,
    pub workspace_ids: Option<Vec<String>>,
    pub knowledge_base_ids: Option<Vec<KnowledgeBaseId>>,
    pub top_k: usize,
    pub threshold: f32,
    pub max_context_length: usize,
    pub include_source: bool,
    pub format: ContextFormat,
    pub candidate_limit: Option<usize>,
}

impl GetContextOptions {
    /// Create options with defaults
    pub fn new(tenant_id: TenantId, query: impl Into<String>) -> Self {
        Self {
            tenant_id,
            query: query.into(),
            workspace_ids: None,
            knowledge_base_ids: None,
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_SCORE_THRESHOLD,
            max_context_length: DEFAULT_CONTEXT_LENGTH,
            include_source: true,
            format: ContextFormat::Plain,
            candidate_limit: None,
        }
    }

    /// Restrict resolution to these workspaces
    pub fn with_workspace_ids(mut self, workspace_ids: Vec<String>) -> Self {
        self.workspace_ids = Some(workspace_ids);
        self
    }

    /// Search exactly these bases, skipping tenant resolution
    pub fn with_knowledge_base_ids(mut self, ids: Vec<KnowledgeBaseId>) -> Self {
        self.knowledge_base_ids = Some(ids);
        self
    }

    /// Set the global result cap
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the minimum similarity score
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the context length bound
    pub fn with_max_context_length(mut self, max_context_length: usize) -> Self {
        self.max_context_length = max_context_length;
        self
    }

    /// Set whether source headers are rendered
    pub fn with_include_source(mut self, include_source: bool) -> Self {
        self.include_source = include_source;
        self
    }

    /// Set the context format
    pub fn with_format(mut self, format: ContextFormat) -> Self {
        self.format = format;
        self
    }

    /// Hint the chunk store to prefilter to this many candidates
    pub fn with_candidate_limit(mut self, limit: usize) -> Self {
        self.candidate_limit = Some(limit);
        self
    }
}

/// Result of a context retrieval call
///
/// `has_context` is true iff the assembled context string is non-empty;
/// callers never receive a partially-built context mislabeled as
/// complete.
#[derive(Debug, Clone)]
pub struct KnowledgeContextResult {
    /// Assembled, bounded context string
    pub context: String,
    /// Globally ranked results backing the context
    pub results: Vec<SearchResult>,
    /// Knowledge bases that were searched
    pub knowledge_base_ids: Vec<KnowledgeBaseId>,
    /// Whether any context was assembled
    pub has_context: bool,
}

impl KnowledgeContextResult {
    fn empty() -> Self {
        Self {
            context: String::new(),
            results: Vec::new(),
            knowledge_base_ids: Vec::new(),
            has_context: false,
        }
    }
}

/// Options for prompt composition
#[derive(Debug, Clone, Default)]
pub struct PromptContextOptions {
    pub context_prefix: Option<String>,
    pub context_suffix: Option<String>,
}

impl PromptContextOptions {
    /// Use the default prefix/suffix wording
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.context_prefix = Some(prefix.into());
        self
    }

    /// Override the suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.context_suffix = Some(suffix.into());
        self
    }
}

/// Compose a prompt with retrieved context. Pure string composition:
/// the base prompt is returned unchanged when there is no context.
pub fn build_prompt_with_context(
    base_prompt: &str,
    knowledge_context: &KnowledgeContextResult,
    options: &PromptContextOptions,
) -> String {
    if !knowledge_context.has_context {
        return base_prompt.to_string();
    }

    let prefix = options
        .context_prefix
        .as_deref()
        .unwrap_or(DEFAULT_CONTEXT_PREFIX);
    let suffix = options
        .context_suffix
        .as_deref()
        .unwrap_or(DEFAULT_CONTEXT_SUFFIX);

    format!(
        "{}{}{}{}",
        base_prompt, prefix, knowledge_context.context, suffix
    )
}

/// Decide whether a query is worth a retrieval round-trip
///
/// Exposed standalone so callers can skip retrieval before ever calling
/// [`RetrievalService::get_knowledge_context`].
pub fn should_search_knowledge_base(query: &str) -> bool {
    gate::should_search(query)
}

/// Retrieval orchestrator over injected collaborators
pub struct RetrievalService {
    repository: Arc<dyn KnowledgeBaseRepository>,
    chunk_store: Arc<dyn ChunkStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    failure_policy: FanOutFailurePolicy,
}

impl std::fmt::Debug for RetrievalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalService")
            .field("failure_policy", &self.failure_policy)
            .finish()
    }
}

impl RetrievalService {
    /// Create a new retrieval service
    pub fn new(
        repository: Arc<dyn KnowledgeBaseRepository>,
        chunk_store: Arc<dyn ChunkStore>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            repository,
            chunk_store,
            embedder,
            failure_policy: FanOutFailurePolicy::default(),
        }
    }

    /// Set the fan-out failure policy
    pub fn with_failure_policy(mut self, policy: FanOutFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Resolve, search and assemble context for a query.
    ///
    /// The query gate may short-circuit the call; an empty resolution
    /// set returns an empty result, not an error. The query is embedded
    /// once and the vector shared read-only across the per-base
    /// ranking, which runs concurrently.
    pub async fn get_knowledge_context(
        &self,
        options: GetContextOptions,
    ) -> Result<KnowledgeContextResult, RetrievalError> {
        if !gate::should_search(&options.query) {
            debug!(tenant_id = %options.tenant_id, "query gated, skipping retrieval");
            return Ok(KnowledgeContextResult::empty());
        }

        let knowledge_base_ids = self.resolve_knowledge_bases(&options).await?;

        if knowledge_base_ids.is_empty() {
            debug!(tenant_id = %options.tenant_id, "no searchable knowledge bases");
            return Ok(KnowledgeContextResult::empty());
        }

        // Single shared embedding; failure here is fatal to the request
        let query_embedding = self.embedder.embed(&options.query).await?;
        let query_vector = query_embedding.vector();

        let rank_options = RankOptions::new()
            .with_top_k(options.top_k)
            .with_threshold(options.threshold);

        let searches = knowledge_base_ids.iter().map(|kb_id| {
            let rank_options = &rank_options;
            let candidate_limit = options.candidate_limit;
            async move {
                let result = self
                    .search_base(kb_id, query_vector, candidate_limit, rank_options)
                    .await;
                (kb_id.clone(), result)
            }
        });

        let mut merged: Vec<SearchResult> = Vec::new();

        for (kb_id, result) in join_all(searches).await {
            match result {
                Ok(results) => merged.extend(results),
                Err(error) => match (self.failure_policy, &error) {
                    // Data-integrity bugs are never degraded away
                    (_, RetrievalError::DimensionMismatch { .. }) => return Err(error),
                    (FanOutFailurePolicy::Abort, _) => return Err(error),
                    (FanOutFailurePolicy::DegradeToPartial, _) => {
                        warn!(
                            knowledge_base_id = %kb_id,
                            error = %error,
                            "knowledge base search failed, continuing with partial results"
                        );
                    }
                },
            }
        }

        // Global re-rank across bases, then the global top_k cap
        sort_results(&mut merged);
        merged.truncate(rank_options.top_k());

        let context_options = ContextOptions::new()
            .with_max_length(options.max_context_length)
            .with_include_source(options.include_source)
            .with_format(options.format);
        let context = build_context(&merged, &context_options);
        let has_context = !context.is_empty();

        info!(
            tenant_id = %options.tenant_id,
            bases = knowledge_base_ids.len(),
            results = merged.len(),
            context_chars = context.chars().count(),
            has_context,
            "knowledge context assembled"
        );

        Ok(KnowledgeContextResult {
            context,
            results: merged,
            knowledge_base_ids,
            has_context,
        })
    }

    async fn resolve_knowledge_bases(
        &self,
        options: &GetContextOptions,
    ) -> Result<Vec<KnowledgeBaseId>, RetrievalError> {
        if let Some(ids) = &options.knowledge_base_ids {
            return Ok(ids.clone());
        }

        let bases = self
            .repository
            .list_active(&options.tenant_id, options.workspace_ids.as_deref())
            .await?;

        Ok(bases.into_iter().map(|base| base.id().clone()).collect())
    }

    async fn search_base(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
        query_vector: &[f32],
        candidate_limit: Option<usize>,
        rank_options: &RankOptions,
    ) -> Result<Vec<SearchResult>, RetrievalError> {
        let candidates = self
            .chunk_store
            .candidate_chunks(knowledge_base_id, Some(query_vector), candidate_limit)
            .await?;

        debug!(
            knowledge_base_id = %knowledge_base_id,
            candidates = candidates.len(),
            "scoring candidate chunks"
        );

        rank(query_vector, &candidates, knowledge_base_id, rank_options)
    }
}
