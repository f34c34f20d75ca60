//! Search
//!
//! Cosine similarity kernel and brute-force top-K retrieval.

mod engine;
mod similarity;

pub use engine::{
    CancelToken, Query, SearchHit, SimilarityEngine, DEFAULT_CANCEL_CHECK_INTERVAL,
};
pub use similarity::{cosine_similarity, dot_product, magnitude};
