//! In-Memory Vector Store
//!
//! Thread-safe map from record id to embedding. Single-writer,
//! consistent-snapshot-reader discipline: mutations are exclusive and
//! readers always observe a fully pre- or post-mutation state.

use std::sync::Arc;
use std::time::Instant;

use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::embedding::Embedding;
use crate::error::{Result, SemrixError};

/// Record identifier
///
/// Identifier uniqueness is owned by the external record store; this core
/// only keys by it.
pub type RecordId = u64;

/// Entry in the store with its embedding and bookkeeping
#[derive(Debug, Clone)]
struct StoredEntry {
    embedding: Embedding,
    /// Monotonic insertion sequence; fixes the `list()` iteration order
    seq: u64,
    created_at: Instant,
    updated_at: Instant,
}

#[derive(Debug)]
struct Inner {
    entries: HashMap<RecordId, StoredEntry>,
    next_seq: u64,
}

/// Thread-safe in-memory embedding store with a fixed dimension
///
/// Every stored embedding has exactly `dimension` components; a vector of
/// any other length is rejected before it can be stored. `list()` returns
/// a point-in-time snapshot in insertion order, so iteration is
/// deterministic between calls on unchanged data.
#[derive(Debug, Clone)]
pub struct VectorStore {
    inner: Arc<RwLock<Inner>>,
    dimension: usize,
}

impl VectorStore {
    /// Create an empty store for embeddings of the given dimension
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                entries: HashMap::new(),
                next_seq: 0,
            })),
            dimension,
        }
    }

    /// Embedding dimension D enforced by this store
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn check_dimension(&self, embedding: &Embedding) -> Result<()> {
        if embedding.dim() != self.dimension {
            return Err(SemrixError::dimension_mismatch(
                self.dimension,
                embedding.dim(),
            ));
        }
        Ok(())
    }

    /// Insert a new record's embedding
    pub fn insert(&self, id: RecordId, embedding: Embedding) -> Result<()> {
        self.check_dimension(&embedding)?;
        let mut inner = self.inner.write();
        if inner.entries.contains_key(&id) {
            return Err(SemrixError::AlreadyExists(id));
        }
        let now = Instant::now();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(
            id,
            StoredEntry {
                embedding,
                seq,
                created_at: now,
                updated_at: now,
            },
        );
        debug!(id, seq, "embedding inserted");
        Ok(())
    }

    /// Replace an existing record's embedding
    ///
    /// The replacement is atomic: concurrent readers see either the old or
    /// the new vector, never a partial one. The entry keeps its insertion
    /// position in `list()`.
    pub fn update(&self, id: RecordId, embedding: Embedding) -> Result<()> {
        self.check_dimension(&embedding)?;
        let mut inner = self.inner.write();
        let entry = inner
            .entries
            .get_mut(&id)
            .ok_or(SemrixError::NotFound(id))?;
        entry.embedding = embedding;
        entry.updated_at = Instant::now();
        debug!(id, "embedding updated");
        Ok(())
    }

    /// Remove a record's embedding
    pub fn delete(&self, id: RecordId) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.entries.remove(&id).is_none() {
            return Err(SemrixError::NotFound(id));
        }
        debug!(id, "embedding deleted");
        Ok(())
    }

    /// Get a record's current embedding
    pub fn get(&self, id: RecordId) -> Result<Embedding> {
        let inner = self.inner.read();
        inner
            .entries
            .get(&id)
            .map(|e| e.embedding.clone())
            .ok_or(SemrixError::NotFound(id))
    }

    /// Check if a record is present
    pub fn contains(&self, id: RecordId) -> bool {
        self.inner.read().entries.contains_key(&id)
    }

    /// Point-in-time snapshot of all entries, in insertion order
    pub fn list(&self) -> Vec<(RecordId, Embedding)> {
        let mut snapshot: Vec<(u64, RecordId, Embedding)> = {
            let inner = self.inner.read();
            inner
                .entries
                .iter()
                .map(|(id, e)| (e.seq, *id, e.embedding.clone()))
                .collect()
        };
        snapshot.sort_by_key(|(seq, _, _)| *seq);
        snapshot.into_iter().map(|(_, id, e)| (id, e)).collect()
    }

    /// How long ago a record was inserted, if present
    pub fn age(&self, id: RecordId) -> Option<std::time::Duration> {
        self.inner
            .read()
            .entries
            .get(&id)
            .map(|e| e.created_at.elapsed())
    }

    /// How long ago a record's embedding last changed, if present
    pub fn staleness(&self, id: RecordId) -> Option<std::time::Duration> {
        self.inner
            .read()
            .entries
            .get(&id)
            .map(|e| e.updated_at.elapsed())
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
