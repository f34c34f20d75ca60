//! Storage
//!
//! In-memory record-id -> embedding store with dimension validation.

mod vector_store;

pub use vector_store::{RecordId, VectorStore};
