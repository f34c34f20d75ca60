//! Semantic Index
//!
//! Facade tying the word-vector model handle, the embedding encoder, the
//! vector store, and the top-K engine into one explicit context object.
//! All state lives here; there is no process-global search object.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::embedding::{encode, Embedding};
use crate::error::{Result, SemrixError};
use crate::metrics::Metrics;
use crate::model::{ModelHandle, SharedModel, WordVectorModel};
use crate::search::{
    CancelToken, Query, SearchHit, SimilarityEngine, DEFAULT_CANCEL_CHECK_INTERVAL,
};
use crate::storage::{RecordId, VectorStore};

/// Semantic index configuration
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Embedding dimension D
    pub dimension: usize,
    /// Result count used by the `nearest` convenience lookup
    pub default_top_k: usize,
    /// Candidates scanned between cancellation checks
    pub cancel_check_interval: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dimension: 100,
            default_top_k: 5,
            cancel_check_interval: DEFAULT_CANCEL_CHECK_INTERVAL,
        }
    }
}

impl IndexConfig {
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_default_top_k(mut self, k: usize) -> Self {
        self.default_top_k = k;
        self
    }

    pub fn with_cancel_check_interval(mut self, interval: usize) -> Self {
        self.cancel_check_interval = interval;
        self
    }
}

/// Semantic similarity index over short text records
///
/// Embeddings are computed exactly when a record is indexed or reindexed,
/// with whichever model snapshot is current at that moment. Installing a
/// new snapshot does NOT re-embed stored records; stale embeddings after a
/// retrain are an accepted, documented property.
#[derive(Clone)]
pub struct SemanticIndex {
    model: ModelHandle,
    store: VectorStore,
    engine: SimilarityEngine,
    config: IndexConfig,
    metrics: Arc<Metrics>,
}

impl SemanticIndex {
    /// Create an index with no model loaded yet
    pub fn new(config: IndexConfig) -> Self {
        let engine =
            SimilarityEngine::new().with_cancel_check_interval(config.cancel_check_interval);
        Self {
            model: ModelHandle::new(),
            store: VectorStore::new(config.dimension),
            engine,
            config,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(IndexConfig::default())
    }

    /// Create an index with a model snapshot already installed
    pub fn with_model(config: IndexConfig, snapshot: SharedModel) -> Result<Self> {
        let index = Self::new(config);
        index.install_model(snapshot)?;
        Ok(index)
    }

    /// Get configuration
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Get the metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Install a new word-vector snapshot
    ///
    /// The snapshot's dimension must match the index's. The swap is atomic
    /// and visible to subsequent encodes; already-stored embeddings keep
    /// their old vectors until explicitly reindexed.
    pub fn install_model(&self, snapshot: SharedModel) -> Result<()> {
        if snapshot.dimension() != self.config.dimension {
            return Err(SemrixError::dimension_mismatch(
                self.config.dimension,
                snapshot.dimension(),
            ));
        }
        self.model.install(snapshot);
        info!(
            dimension = self.config.dimension,
            records = self.store.len(),
            "model installed; existing embeddings left as-is"
        );
        Ok(())
    }

    /// Whether a model snapshot is loaded
    pub fn is_model_loaded(&self) -> bool {
        self.model.is_loaded()
    }

    fn current_snapshot(&self) -> Result<SharedModel> {
        self.model.snapshot().ok_or(SemrixError::ModelNotReady)
    }

    /// Encode a text against the current snapshot
    pub fn encode(&self, text: &str) -> Result<Embedding> {
        let started = Instant::now();
        let snapshot = self.current_snapshot()?;
        let result = encode(text, snapshot.as_ref());
        self.metrics.record_operation("encode", started.elapsed());
        result
    }

    /// Index a new record's content
    pub fn index(&self, id: RecordId, text: &str) -> Result<()> {
        let started = Instant::now();
        let snapshot = self.current_snapshot()?;
        let embedding = encode(text, snapshot.as_ref())?;
        self.store.insert(id, embedding)?;
        self.metrics.record_operation("index", started.elapsed());
        Ok(())
    }

    /// Re-embed an existing record after a content change
    ///
    /// This is the only path that recomputes a stored embedding.
    pub fn reindex(&self, id: RecordId, text: &str) -> Result<()> {
        let started = Instant::now();
        let snapshot = self.current_snapshot()?;
        let embedding = encode(text, snapshot.as_ref())?;
        self.store.update(id, embedding)?;
        self.metrics.record_operation("reindex", started.elapsed());
        Ok(())
    }

    /// Drop a record's embedding
    pub fn remove(&self, id: RecordId) -> Result<()> {
        let started = Instant::now();
        self.store.delete(id)?;
        self.metrics.record_operation("remove", started.elapsed());
        Ok(())
    }

    /// Get a record's current embedding
    pub fn embedding_of(&self, id: RecordId) -> Result<Embedding> {
        self.store.get(id)
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// General top-K search with optional cooperative cancellation
    pub fn search(
        &self,
        query: &Query,
        k: usize,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<SearchHit>> {
        let started = Instant::now();
        let result = self.engine.top_k(&self.store, query, k, cancel);
        self.metrics.record_operation("search", started.elapsed());
        result
    }

    /// The `k` records most similar to a stored record (excluding itself)
    pub fn similar_to(&self, id: RecordId, k: usize) -> Result<Vec<SearchHit>> {
        self.search(&Query::Record(id), k, None)
    }

    /// The `k` records most similar to an ad-hoc text
    pub fn similar_to_text(&self, text: &str, k: usize) -> Result<Vec<SearchHit>> {
        let query = Query::Vector(self.encode(text)?);
        self.search(&query, k, None)
    }

    /// The default number of records most similar to a stored record
    pub fn nearest(&self, id: RecordId) -> Result<Vec<SearchHit>> {
        self.similar_to(id, self.config.default_top_k)
    }
}

impl std::fmt::Debug for SemanticIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticIndex")
            .field("records", &self.store.len())
            .field("model_loaded", &self.is_model_loaded())
            .field("dimension", &self.config.dimension)
            .finish()
    }
}
