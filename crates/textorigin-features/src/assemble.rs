//! Concatenation of lexical and stylometric features into the single
//! sparse vector the classifier was trained on.
//!
//! Column layout is fixed: the first `lexical_dim` columns are the TF-IDF
//! weights, the following [`STYLOMETRIC_DIM`](crate::stylometry::STYLOMETRIC_DIM)
//! columns are the stylometric profile in its canonical order. Training
//! used the same layout; changing it invalidates the fitted model.

use sprs::CsVec;

use crate::stylometry::{STYLOMETRIC_DIM, StylometricProfile};

/// A fully assembled model input row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    vector: CsVec<f64>,
    lexical_dim: usize,
}

impl FeatureVector {
    /// Width of the lexical block (the fitted vocabulary size).
    #[must_use]
    pub fn lexical_dim(&self) -> usize {
        self.lexical_dim
    }

    /// Total width: lexical block plus stylometric block.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.vector.dim()
    }

    #[must_use]
    pub fn as_sparse(&self) -> &CsVec<f64> {
        &self.vector
    }

    /// Dense copy of the row. Tree traversal indexes columns arbitrarily,
    /// so the classifier consumes this form.
    #[must_use]
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.vector.dim()];
        for (idx, value) in self.vector.iter() {
            dense[idx] = *value;
        }
        dense
    }
}

/// Concatenate a lexical row and a stylometric profile.
///
/// The lexical row keeps its column positions; stylometric values land at
/// `lexical_dim + i` in canonical feature order. Stylometric zeros are not
/// stored, keeping the row sparse.
pub fn assemble(lexical: CsVec<f64>, profile: &StylometricProfile) -> FeatureVector {
    let lexical_dim = lexical.dim();
    let (mut indices, mut data) = (Vec::new(), Vec::new());
    indices.extend_from_slice(lexical.indices());
    data.extend_from_slice(lexical.data());

    for (offset, value) in profile.to_vector().into_iter().enumerate() {
        if value != 0.0 {
            indices.push(lexical_dim + offset);
            data.push(value);
        }
    }

    FeatureVector {
        vector: CsVec::new(lexical_dim + STYLOMETRIC_DIM, indices, data),
        lexical_dim,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn lexical_row() -> CsVec<f64> {
        CsVec::new(4, vec![1, 3], vec![0.5, 0.25])
    }

    #[test]
    fn stylometric_block_lands_after_lexical_block() {
        let profile = StylometricProfile {
            word_count: 6.0,
            avg_word_length: 3.5,
            ..StylometricProfile::default()
        };
        let features = assemble(lexical_row(), &profile);

        assert_eq!(features.dim(), 4 + STYLOMETRIC_DIM);
        assert_eq!(features.lexical_dim(), 4);

        let dense = features.to_dense();
        assert!((dense[1] - 0.5).abs() < EPS);
        assert!((dense[3] - 0.25).abs() < EPS);
        // word_count is canonical column 0, avg_word_length column 3.
        assert!((dense[4] - 6.0).abs() < EPS);
        assert!((dense[4 + 3] - 3.5).abs() < EPS);
    }

    #[test]
    fn zero_profile_values_stay_unstored() {
        let features = assemble(lexical_row(), &StylometricProfile::default());
        assert_eq!(features.as_sparse().nnz(), 2);
        assert_eq!(features.dim(), 4 + STYLOMETRIC_DIM);
    }

    #[test]
    fn empty_lexical_row_still_carries_stylometry() {
        let empty = CsVec::new(4, Vec::new(), Vec::new());
        let profile = StylometricProfile {
            word_count: 2.0,
            ..StylometricProfile::default()
        };
        let features = assemble(empty, &profile);
        let dense = features.to_dense();
        assert!((dense[4] - 2.0).abs() < EPS);
        assert_eq!(features.as_sparse().nnz(), 1);
    }
}
