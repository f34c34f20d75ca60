//! Text Encoder
//!
//! Turns a text into one embedding by averaging the word vectors of its
//! in-vocabulary tokens.

use tracing::trace;

use crate::error::{Result, SemrixError};
use crate::model::WordVectorModel;

use super::types::Embedding;

/// Encode a text against a word-vector snapshot
///
/// The text is split on whitespace; tokens are matched verbatim (no case
/// folding, stemming, or punctuation stripping). Out-of-vocabulary tokens
/// are skipped silently. The result is the elementwise mean of the vectors
/// of the in-vocabulary tokens, or the all-zero vector when none matched
/// (including empty input).
///
/// Deterministic: the same text against the same snapshot always yields
/// bit-identical output.
pub fn encode(text: &str, model: &dyn WordVectorModel) -> Result<Embedding> {
    if !model.is_loaded() {
        return Err(SemrixError::ModelNotReady);
    }

    let dimension = model.dimension();
    let mut sum = vec![0.0f32; dimension];
    let mut matched = 0usize;

    // OOV tokens contribute nothing
    for token in text.split_whitespace() {
        if let Some(vector) = model.lookup(token) {
            for (acc, component) in sum.iter_mut().zip(vector) {
                *acc += component;
            }
            matched += 1;
        }
    }

    if matched == 0 {
        trace!(text_len = text.len(), "no in-vocabulary tokens, zero embedding");
        return Ok(Embedding::zeros(dimension));
    }

    let count = matched as f32;
    for component in sum.iter_mut() {
        *component /= count;
    }

    trace!(matched, dimension, "text encoded");
    Ok(Embedding::from(sum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InMemoryWordVectors;

    fn cat_dog_model() -> InMemoryWordVectors {
        InMemoryWordVectors::from_pairs(
            2,
            vec![("cat", vec![1.0, 0.0]), ("dog", vec![0.0, 1.0])],
        )
        .unwrap()
    }

    struct UnloadedModel;

    impl WordVectorModel for UnloadedModel {
        fn dimension(&self) -> usize {
            2
        }

        fn lookup(&self, _token: &str) -> Option<&[f32]> {
            None
        }

        fn is_loaded(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_mean_of_in_vocabulary_tokens() {
        let model = cat_dog_model();
        let embedding = encode("cat dog", &model).unwrap();
        assert_eq!(embedding.as_slice(), &[0.5, 0.5]);
    }

    #[test]
    fn test_repeated_tokens_count_each_occurrence() {
        let model = cat_dog_model();
        let embedding = encode("cat cat", &model).unwrap();
        assert_eq!(embedding.as_slice(), &[1.0, 0.0]);
    }

    #[test]
    fn test_oov_tokens_are_skipped() {
        let model = cat_dog_model();
        // "fish" contributes nothing; the mean is over "cat" alone
        let embedding = encode("cat fish", &model).unwrap();
        assert_eq!(embedding.as_slice(), &[1.0, 0.0]);
    }

    #[test]
    fn test_all_oov_yields_zero_vector() {
        let model = cat_dog_model();
        let embedding = encode("fish", &model).unwrap();
        assert!(embedding.is_zero());
        assert_eq!(embedding.dim(), 2);
    }

    #[test]
    fn test_empty_text_yields_zero_vector() {
        let model = cat_dog_model();
        let embedding = encode("", &model).unwrap();
        assert!(embedding.is_zero());
    }

    #[test]
    fn test_no_case_folding() {
        let model = cat_dog_model();
        // "Cat" is a different token than "cat" and is out of vocabulary
        let embedding = encode("Cat", &model).unwrap();
        assert!(embedding.is_zero());
    }

    #[test]
    fn test_deterministic() {
        let model = cat_dog_model();
        let first = encode("cat dog dog", &model).unwrap();
        let second = encode("cat dog dog", &model).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_model_not_ready() {
        let result = encode("cat", &UnloadedModel);
        assert_eq!(result.err(), Some(SemrixError::ModelNotReady));
    }
}
