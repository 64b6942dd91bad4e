//! Similarity metrics and candidate ranking

use serde::{Deserialize, Serialize};

use crate::domain::error::RetrievalError;
use crate::domain::knowledge_base::{Chunk, KnowledgeBaseId, SearchResult};

/// Default number of results returned per query
pub const DEFAULT_TOP_K: usize = 5;

/// Bounds for top_k
pub const MIN_TOP_K: usize = 1;
pub const MAX_TOP_K: usize = 20;

/// Default minimum similarity score
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.7;

/// Cosine similarity between two vectors: dot(a,b) / (‖a‖·‖b‖)
///
/// A zero-norm vector scores 0.0 against everything; it is treated as
/// maximally dissimilar instead of raising a division error. Comparing
/// vectors of different lengths is a data-integrity bug upstream
/// (embeddings from different models) and fails hard.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, RetrievalError> {
    if a.len() != b.len() {
        return Err(RetrievalError::dimension_mismatch(a.len(), b.len()));
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}

/// Euclidean distance between two vectors
///
/// Auxiliary metric for diagnostics and alternate ranking; cosine is the
/// default.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> Result<f32, RetrievalError> {
    if a.len() != b.len() {
        return Err(RetrievalError::dimension_mismatch(a.len(), b.len()));
    }

    let sum: f32 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum();

    Ok(sum.sqrt())
}

/// Ranking metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    /// Cosine similarity, the default
    #[default]
    Cosine,
    /// Euclidean distance mapped to a similarity score as 1 / (1 + d)
    Euclidean,
}

/// Options for ranking a candidate set
#[derive(Debug, Clone)]
pub struct RankOptions {
    top_k: usize,
    threshold: f32,
    metric: SimilarityMetric,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_SCORE_THRESHOLD,
            metric: SimilarityMetric::Cosine,
        }
    }
}

impl RankOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set top_k, clamped to the supported range
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.clamp(MIN_TOP_K, MAX_TOP_K);
        self
    }

    /// Set the minimum score
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the metric
    pub fn with_metric(mut self, metric: SimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Get top_k
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Get the minimum score
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Get the metric
    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }
}

fn score(metric: SimilarityMetric, query: &[f32], candidate: &[f32]) -> Result<f32, RetrievalError> {
    match metric {
        SimilarityMetric::Cosine => cosine_similarity(query, candidate),
        SimilarityMetric::Euclidean => {
            let distance = euclidean_distance(query, candidate)?;
            Ok(1.0 / (1.0 + distance))
        }
    }
}

/// Order results by descending score, ties broken by earliest chunk
/// ordinal so equal scores rank deterministically.
pub fn sort_results(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.ordinal.cmp(&b.ordinal))
    });
}

/// Score every candidate against the query vector, discard scores below
/// the threshold, sort descending and truncate to top_k.
pub fn rank(
    query: &[f32],
    candidates: &[Chunk],
    knowledge_base_id: &KnowledgeBaseId,
    options: &RankOptions,
) -> Result<Vec<SearchResult>, RetrievalError> {
    let mut results = Vec::new();

    for chunk in candidates {
        let score = score(options.metric, query, &chunk.embedding)?;

        if score < options.threshold {
            continue;
        }

        let mut result = SearchResult::new(
            chunk.id,
            knowledge_base_id.clone(),
            chunk.ordinal,
            chunk.text.clone(),
            score,
        );

        if let Some(source) = &chunk.source {
            result = result.with_source(source);
        }

        results.push(result);
    }

    sort_results(&mut results);
    results.truncate(options.top_k);

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn chunk(ordinal: usize, embedding: Vec<f32>) -> Chunk {
        Chunk::new(Uuid::new_v4(), ordinal, format!("chunk {}", ordinal), embedding)
    }

    fn kb_id() -> KnowledgeBaseId {
        KnowledgeBaseId::new("faq").unwrap()
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let a = vec![0.3, 0.5, 0.2];
        let similarity = cosine_similarity(&a, &a).unwrap();
        assert!((similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![-0.5, 0.25, 4.0];

        assert_eq!(
            cosine_similarity(&a, &b).unwrap(),
            cosine_similarity(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_norm_scores_zero() {
        let zero = vec![0.0, 0.0, 0.0];
        let other = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &other).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&other, &zero).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];

        assert!(matches!(
            cosine_similarity(&a, &b),
            Err(RetrievalError::DimensionMismatch { left: 2, right: 3 })
        ));
    }

    #[test]
    fn test_euclidean_non_negative_and_zero_on_self() {
        let a = vec![1.0, -2.0, 3.0];
        let b = vec![4.0, 0.0, -1.0];

        assert!(euclidean_distance(&a, &b).unwrap() >= 0.0);
        assert!(euclidean_distance(&a, &a).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_euclidean_triangle_inequality() {
        let a = vec![0.0, 0.0];
        let b = vec![3.0, 4.0];
        let c = vec![1.0, 1.0];

        let ab = euclidean_distance(&a, &b).unwrap();
        let ac = euclidean_distance(&a, &c).unwrap();
        let cb = euclidean_distance(&c, &b).unwrap();

        assert!(ab <= ac + cb + 1e-6);
    }

    #[test]
    fn test_rank_filters_below_threshold() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            chunk(0, vec![1.0, 0.0]),  // score 1.0
            chunk(1, vec![0.0, 1.0]),  // score 0.0
            chunk(2, vec![0.9, 0.1]),  // score ~0.99
        ];

        let results = rank(&query, &candidates, &kb_id(), &RankOptions::new()).unwrap();

        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(result.score >= DEFAULT_SCORE_THRESHOLD);
        }
        assert_eq!(results[0].ordinal, 0);
        assert_eq!(results[1].ordinal, 2);
    }

    #[test]
    fn test_rank_ties_broken_by_ordinal() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            chunk(5, vec![2.0, 0.0]),
            chunk(1, vec![1.0, 0.0]),
            chunk(3, vec![0.5, 0.0]),
        ];

        let results = rank(&query, &candidates, &kb_id(), &RankOptions::new()).unwrap();

        // All score 1.0; ordinal decides
        assert_eq!(
            results.iter().map(|r| r.ordinal).collect::<Vec<_>>(),
            vec![1, 3, 5]
        );
    }

    #[test]
    fn test_rank_truncates_to_top_k() {
        let query = vec![1.0, 0.0];
        let candidates: Vec<Chunk> = (0..10).map(|i| chunk(i, vec![1.0, 0.0])).collect();

        let options = RankOptions::new().with_top_k(3);
        let results = rank(&query, &candidates, &kb_id(), &options).unwrap();

        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let query = vec![1.0, 0.2];
        let candidates = vec![
            chunk(0, vec![0.8, 0.3]),
            chunk(1, vec![1.0, 0.2]),
            chunk(2, vec![0.7, 0.4]),
        ];
        let options = RankOptions::new().with_threshold(0.0);

        let first = rank(&query, &candidates, &kb_id(), &options).unwrap();
        let second = rank(&query, &candidates, &kb_id(), &options).unwrap();

        let order_a: Vec<usize> = first.iter().map(|r| r.ordinal).collect();
        let order_b: Vec<usize> = second.iter().map(|r| r.ordinal).collect();
        assert_eq!(order_a, order_b);

        // Re-sorting an already sorted set changes nothing
        let mut resorted = first.clone();
        sort_results(&mut resorted);
        let order_c: Vec<usize> = resorted.iter().map(|r| r.ordinal).collect();
        assert_eq!(order_a, order_c);
    }

    #[test]
    fn test_rank_dimension_mismatch_is_fatal() {
        let query = vec![1.0, 0.0, 0.0];
        let candidates = vec![chunk(0, vec![1.0, 0.0])];

        assert!(matches!(
            rank(&query, &candidates, &kb_id(), &RankOptions::new()),
            Err(RetrievalError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_top_k_clamped() {
        assert_eq!(RankOptions::new().with_top_k(0).top_k(), MIN_TOP_K);
        assert_eq!(RankOptions::new().with_top_k(100).top_k(), MAX_TOP_K);
        assert_eq!(RankOptions::new().with_top_k(7).top_k(), 7);
    }

    #[test]
    fn test_euclidean_metric_ranks_nearest_first() {
        let query = vec![1.0, 1.0];
        let candidates = vec![
            chunk(0, vec![5.0, 5.0]),
            chunk(1, vec![1.0, 1.1]),
        ];

        let options = RankOptions::new()
            .with_metric(SimilarityMetric::Euclidean)
            .with_threshold(0.0);
        let results = rank(&query, &candidates, &kb_id(), &options).unwrap();

        assert_eq!(results[0].ordinal, 1);
        assert!(results[0].score > results[1].score);
    }
}
