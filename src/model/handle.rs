//! Current-Model Handle
//!
//! Shared reference to the word-vector snapshot in use. Replacing the
//! snapshot after a retrain is a single pointer swap; snapshots themselves
//! are never mutated in place.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use super::word_vectors::{SharedModel, WordVectorModel};

/// Swappable handle to the current word-vector snapshot
///
/// Cloning the handle shares the same slot, so a swap through any clone is
/// visible to every holder. Embeddings computed before a swap are NOT
/// recomputed; staleness against a newer snapshot is the documented
/// trade-off of full-replace retraining.
#[derive(Clone, Default)]
pub struct ModelHandle {
    current: Arc<RwLock<Option<SharedModel>>>,
}

impl ModelHandle {
    /// Create an empty handle (no snapshot loaded)
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a handle already holding a snapshot
    pub fn with_snapshot(snapshot: SharedModel) -> Self {
        Self {
            current: Arc::new(RwLock::new(Some(snapshot))),
        }
    }

    /// Install a new snapshot, replacing any previous one
    ///
    /// Subsequent `snapshot()` calls observe the new model; callers that
    /// already hold an `Arc` keep reading the old one until they drop it.
    pub fn install(&self, snapshot: SharedModel) {
        let dimension = snapshot.dimension();
        *self.current.write() = Some(snapshot);
        info!(dimension, "word-vector snapshot installed");
    }

    /// Get the current snapshot, if any
    pub fn snapshot(&self) -> Option<SharedModel> {
        self.current.read().clone()
    }

    /// Whether a usable snapshot is loaded
    pub fn is_loaded(&self) -> bool {
        self.current
            .read()
            .as_ref()
            .map(|m| m.is_loaded())
            .unwrap_or(false)
    }

    /// Dimension of the current snapshot, if any
    pub fn dimension(&self) -> Option<usize> {
        self.current.read().as_ref().map(|m| m.dimension())
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("loaded", &self.is_loaded())
            .field("dimension", &self.dimension())
            .finish()
    }
}
