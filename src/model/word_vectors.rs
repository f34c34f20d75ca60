//! Word-Vector Lookup Contract
//!
//! Token -> vector tables produced by external training. The core only
//! consumes snapshots through this trait; it never trains or mutates them.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::error::{Result, SemrixError};

/// Shared, immutable word-vector snapshot
pub type SharedModel = Arc<dyn WordVectorModel>;

/// Lookup contract for a trained word-vector snapshot
///
/// A snapshot is immutable once obtained. Two snapshots from different
/// training runs need not agree on the vector for any token, so callers
/// must never assume cross-snapshot stability.
pub trait WordVectorModel: Send + Sync {
    /// Vector dimension D; every vector yielded by `lookup` has this length
    fn dimension(&self) -> usize;

    /// Look up the vector for a token; `None` means out-of-vocabulary
    fn lookup(&self, token: &str) -> Option<&[f32]>;

    /// Whether the snapshot is usable for lookups
    fn is_loaded(&self) -> bool {
        true
    }
}

/// In-memory word-vector snapshot
///
/// Immutable token -> vector table with a fixed dimension. This is the
/// adapter an external training layer (or a test) uses to materialize a
/// snapshot.
#[derive(Debug, Clone)]
pub struct InMemoryWordVectors {
    vectors: HashMap<String, Vec<f32>>,
    dimension: usize,
}

impl InMemoryWordVectors {
    /// Build a snapshot from `(token, vector)` pairs
    ///
    /// Every vector must have exactly `dimension` components.
    pub fn from_pairs<I, S>(dimension: usize, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut vectors = HashMap::new();
        for (token, vector) in pairs {
            if vector.len() != dimension {
                return Err(SemrixError::dimension_mismatch(dimension, vector.len()));
            }
            vectors.insert(token.into(), vector);
        }
        Ok(Self { vectors, dimension })
    }

    /// Number of tokens in the vocabulary
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Check if the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Check if a token is in vocabulary
    pub fn contains(&self, token: &str) -> bool {
        self.vectors.contains_key(token)
    }
}

impl WordVectorModel for InMemoryWordVectors {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn lookup(&self, token: &str) -> Option<&[f32]> {
        self.vectors.get(token).map(Vec::as_slice)
    }
}
