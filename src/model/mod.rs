//! Word-Vector Model
//!
//! Lookup contract for externally trained word vectors, an in-memory
//! snapshot implementation, and the swappable current-model handle.

mod handle;
mod word_vectors;

pub use handle::ModelHandle;
pub use word_vectors::{InMemoryWordVectors, SharedModel, WordVectorModel};
