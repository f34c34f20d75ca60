//! Embedding Vector Type
//!
//! A validated fixed-length `f32` vector. Length checks happen at every
//! store and model boundary so a wrong-sized vector can never be stored.

use std::ops::Deref;

use crate::error::{Result, SemrixError};

/// Fixed-length embedding vector
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// Create an embedding, validating the length against `dimension`
    pub fn new(values: Vec<f32>, dimension: usize) -> Result<Self> {
        if values.len() != dimension {
            return Err(SemrixError::dimension_mismatch(dimension, values.len()));
        }
        Ok(Self(values))
    }

    /// The all-zero embedding of the given dimension
    ///
    /// This is the defined result of encoding a text with no in-vocabulary
    /// tokens; it is a valid embedding, not an error value.
    pub fn zeros(dimension: usize) -> Self {
        Self(vec![0.0; dimension])
    }

    /// Number of components
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// View as a slice
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Consume into the underlying vector
    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }

    /// Whether every component is exactly zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|c| *c == 0.0)
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

impl AsRef<[f32]> for Embedding {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

impl Deref for Embedding {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        assert!(Embedding::new(vec![1.0, 2.0], 2).is_ok());
        assert_eq!(
            Embedding::new(vec![1.0, 2.0], 3).err(),
            Some(SemrixError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_zeros() {
        let z = Embedding::zeros(4);
        assert_eq!(z.dim(), 4);
        assert!(z.is_zero());
        assert_eq!(z.as_slice(), &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_deref_and_from() {
        let e = Embedding::from(vec![0.5, 0.5]);
        assert_eq!(e.len(), 2);
        assert!(!e.is_zero());
        assert_eq!(e[0], 0.5);
        assert_eq!(e.into_vec(), vec![0.5, 0.5]);
    }
}
