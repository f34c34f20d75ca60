//! Top-K Similarity Engine
//!
//! Brute-force nearest-neighbor retrieval by cosine similarity over a
//! point-in-time store snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::embedding::Embedding;
use crate::error::{Result, SemrixError};
use crate::storage::{RecordId, VectorStore};

use super::similarity::cosine_similarity;

/// How many candidates to scan between cancellation checks
pub const DEFAULT_CANCEL_CHECK_INTERVAL: usize = 1024;

/// Cooperative cancellation flag for long scans
///
/// Clones share the same flag; `cancel()` through any clone is observed by
/// an in-flight scan at its next check point. A token that is never
/// cancelled does not change results in any way.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Similarity query: an existing record or an ad-hoc vector
#[derive(Debug, Clone)]
pub enum Query {
    /// Score against a stored record's current embedding; the record
    /// itself is excluded from the results
    Record(RecordId),
    /// Score against a caller-supplied embedding; nothing is excluded
    Vector(Embedding),
}

/// One scored search result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: RecordId,
    pub score: f32,
}

/// Brute-force cosine top-K engine
///
/// Cost is O(N * D) per query; no index is built. An approximate or
/// tree-based index would be a separate component layered on the same
/// store contract.
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    cancel_check_interval: usize,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityEngine {
    /// Create an engine with the default cancellation check interval
    pub fn new() -> Self {
        Self {
            cancel_check_interval: DEFAULT_CANCEL_CHECK_INTERVAL,
        }
    }

    /// Set how many candidates are scanned between cancellation checks
    pub fn with_cancel_check_interval(mut self, interval: usize) -> Self {
        self.cancel_check_interval = interval.max(1);
        self
    }

    /// Find the `k` stored embeddings most similar to the query
    ///
    /// Scans one `list()` snapshot of the store; mutations racing with the
    /// scan are invisible to it. Results are sorted by descending score;
    /// equal scores keep the snapshot's insertion order, so output is
    /// deterministic. Returns at most `min(k, candidate_count)` hits.
    pub fn top_k(
        &self,
        store: &VectorStore,
        query: &Query,
        k: usize,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<SearchHit>> {
        if k == 0 {
            return Err(SemrixError::invalid_input("k must be at least 1"));
        }

        let (query_vector, exclude) = match query {
            Query::Record(id) => (store.get(*id)?, Some(*id)),
            Query::Vector(v) => {
                if v.dim() != store.dimension() {
                    return Err(SemrixError::dimension_mismatch(store.dimension(), v.dim()));
                }
                (v.clone(), None)
            }
        };

        let candidates = store.list();
        let total = candidates.len();
        let mut hits = Vec::with_capacity(total);

        for (scanned, (id, embedding)) in candidates.into_iter().enumerate() {
            if let Some(token) = cancel {
                if scanned % self.cancel_check_interval == 0 && token.is_cancelled() {
                    debug!(scanned, total, "top-k scan cancelled");
                    return Err(SemrixError::Cancelled);
                }
            }

            if exclude == Some(id) {
                continue;
            }

            let score = cosine_similarity(&query_vector, &embedding);
            hits.push(SearchHit { id, score });
        }

        // Stable sort: equal scores keep snapshot order
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);

        debug!(k, total, returned = hits.len(), "top-k scan complete");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_store() -> VectorStore {
        // r1 = mean("cat dog"), r2 = "cat", r3 = "dog"
        let store = VectorStore::new(2);
        store.insert(1, Embedding::from(vec![0.5, 0.5])).unwrap();
        store.insert(2, Embedding::from(vec![1.0, 0.0])).unwrap();
        store.insert(3, Embedding::from(vec![0.0, 1.0])).unwrap();
        store
    }

    #[test]
    fn test_top_k_for_stored_record() {
        let store = scenario_store();
        let engine = SimilarityEngine::new();

        let hits = engine.top_k(&store, &Query::Record(2), 2, None).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 1);
        assert!((hits[0].score - 0.7071).abs() < 1e-3);
        assert_eq!(hits[1].id, 3);
        assert_eq!(hits[1].score, 0.0);
    }

    #[test]
    fn test_record_query_excludes_itself() {
        let store = scenario_store();
        let engine = SimilarityEngine::new();

        let hits = engine.top_k(&store, &Query::Record(2), 10, None).unwrap();
        assert!(hits.iter().all(|h| h.id != 2));
        // At most min(k, N - 1) results
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_vector_query_scores_every_record() {
        let store = scenario_store();
        let engine = SimilarityEngine::new();

        let query = Query::Vector(Embedding::from(vec![1.0, 0.0]));
        let hits = engine.top_k(&store, &query, 10, None).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, 2);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scores_are_non_increasing() {
        let store = scenario_store();
        let engine = SimilarityEngine::new();

        let query = Query::Vector(Embedding::from(vec![0.7, 0.3]));
        let hits = engine.top_k(&store, &query, 3, None).unwrap();
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let store = VectorStore::new(2);
        // All entries have the same direction, so every score ties at 1.0
        store.insert(7, Embedding::from(vec![1.0, 0.0])).unwrap();
        store.insert(5, Embedding::from(vec![2.0, 0.0])).unwrap();
        store.insert(6, Embedding::from(vec![3.0, 0.0])).unwrap();

        let engine = SimilarityEngine::new();
        let query = Query::Vector(Embedding::from(vec![1.0, 0.0]));
        let ids: Vec<RecordId> = engine
            .top_k(&store, &query, 3, None)
            .unwrap()
            .into_iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(ids, vec![7, 5, 6]);
    }

    #[test]
    fn test_zero_magnitude_candidates_score_zero() {
        let store = VectorStore::new(2);
        store.insert(1, Embedding::zeros(2)).unwrap();
        store.insert(2, Embedding::from(vec![1.0, 0.0])).unwrap();

        let engine = SimilarityEngine::new();
        let query = Query::Vector(Embedding::from(vec![0.0, 1.0]));
        let hits = engine.top_k(&store, &query, 2, None).unwrap();

        let zero_hit = hits.iter().find(|h| h.id == 1).unwrap();
        assert_eq!(zero_hit.score, 0.0);
        assert!(hits.iter().all(|h| h.score.is_finite()));
    }

    #[test]
    fn test_zero_query_record_scores_all_zero() {
        let store = VectorStore::new(2);
        store.insert(1, Embedding::zeros(2)).unwrap();
        store.insert(2, Embedding::from(vec![1.0, 0.0])).unwrap();
        store.insert(3, Embedding::from(vec![0.0, 1.0])).unwrap();

        let engine = SimilarityEngine::new();
        let hits = engine.top_k(&store, &Query::Record(1), 5, None).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.score == 0.0));
        // Ties keep insertion order
        assert_eq!(hits[0].id, 2);
        assert_eq!(hits[1].id, 3);
    }

    #[test]
    fn test_k_zero_is_invalid() {
        let store = scenario_store();
        let engine = SimilarityEngine::new();

        let result = engine.top_k(&store, &Query::Record(1), 0, None);
        assert!(matches!(result, Err(SemrixError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_record_is_not_found() {
        let store = scenario_store();
        let engine = SimilarityEngine::new();

        let result = engine.top_k(&store, &Query::Record(42), 2, None);
        assert_eq!(result.err(), Some(SemrixError::NotFound(42)));
    }

    #[test]
    fn test_wrong_dimension_query_vector() {
        let store = scenario_store();
        let engine = SimilarityEngine::new();

        let query = Query::Vector(Embedding::from(vec![1.0, 0.0, 0.0]));
        let result = engine.top_k(&store, &query, 2, None);
        assert_eq!(
            result.err(),
            Some(SemrixError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_truncates_to_candidate_count() {
        let store = scenario_store();
        let engine = SimilarityEngine::new();

        let query = Query::Vector(Embedding::from(vec![1.0, 1.0]));
        let hits = engine.top_k(&store, &query, 100, None).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_cancelled_token_aborts_scan() {
        let store = scenario_store();
        let engine = SimilarityEngine::new().with_cancel_check_interval(1);

        let token = CancelToken::new();
        token.cancel();
        let result = engine.top_k(&store, &Query::Record(2), 2, Some(&token));
        assert_eq!(result.err(), Some(SemrixError::Cancelled));
    }

    #[test]
    fn test_uncancelled_token_changes_nothing() {
        let store = scenario_store();
        let engine = SimilarityEngine::new().with_cancel_check_interval(1);

        let token = CancelToken::new();
        let with_token = engine
            .top_k(&store, &Query::Record(2), 2, Some(&token))
            .unwrap();
        let without_token = engine.top_k(&store, &Query::Record(2), 2, None).unwrap();
        assert_eq!(with_token, without_token);
    }
}
