//! Error Types
//!
//! Typed, recoverable failures for the embedding and search subsystem.

use crate::storage::RecordId;

/// SEMRIX error types
///
/// Every variant is recoverable; none is fatal to the process. Note that
/// out-of-vocabulary tokens are NOT an error: they are silently skipped by
/// the encoder, and an all-OOV text encodes to the zero vector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemrixError {
    /// No word-vector snapshot is available
    #[error("word-vector model is not loaded")]
    ModelNotReady,

    /// A vector of the wrong length hit a store or model boundary
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Insert on an id that is already present
    #[error("record {0} already exists")]
    AlreadyExists(RecordId),

    /// Lookup, update, or delete on an absent id
    #[error("record {0} not found")]
    NotFound(RecordId),

    /// Caller-supplied parameter is invalid
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A search scan observed its cancellation token
    #[error("search cancelled")]
    Cancelled,
}

impl SemrixError {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, SemrixError>;
