use ahash::HashMap;
use rayon::prelude::*;
use sprs::{CsMat, CsVec};
use tracing::debug;

use super::{ngrams, params::VectorizerParams};

/// Minimum number of texts to consider parallelization
const MIN_TEXTS_FOR_PARALLEL: usize = 100;

/// Minimum total character count to consider parallelization
const MIN_CHARS_FOR_PARALLEL: usize = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum VectorizerError {
    #[cfg(feature = "bincode")]
    #[error("failed to decode vectorizer artifact")]
    Decode(#[from] bincode::error::DecodeError),
    #[cfg(feature = "bincode")]
    #[error("failed to encode vectorizer artifact")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("idf table has {idf_len} entries but the vocabulary has {vocab_len}")]
    IdfLength { idf_len: usize, vocab_len: usize },
    #[error("vocabulary indices do not form a dense 0..{size} range")]
    VocabularyIndices { size: usize },
    #[error("ngram sizes must be a non-empty list of values >= 1")]
    NgramSizes,
}

/// Pre-fitted TF-IDF vectorizer over word-level n-grams.
///
/// Fitting happens offline; this type only transforms. Terms absent from
/// the fitted vocabulary are silently dropped, so the output dimension is
/// always the fitted vocabulary size.
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct TfidfVectorizer {
    params: VectorizerParams,
    vocab: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Assemble a vectorizer from its fitted pieces, validating that they
    /// belong together: at least one nonzero n-gram size, one IDF weight
    /// per vocabulary entry, and vocabulary indices forming a dense
    /// `0..len` range (each index names a column).
    pub fn from_parts(
        params: VectorizerParams,
        vocab: HashMap<String, usize>,
        idf: Vec<f64>,
    ) -> Result<Self, VectorizerError> {
        let sizes = params.ngram_counts();
        if sizes.is_empty() || sizes.contains(&0) {
            return Err(VectorizerError::NgramSizes);
        }
        if idf.len() != vocab.len() {
            return Err(VectorizerError::IdfLength {
                idf_len: idf.len(),
                vocab_len: vocab.len(),
            });
        }
        let mut seen = vec![false; vocab.len()];
        for &idx in vocab.values() {
            if idx >= seen.len() || seen[idx] {
                return Err(VectorizerError::VocabularyIndices { size: vocab.len() });
            }
            seen[idx] = true;
        }
        debug!(
            vocab_size = vocab.len(),
            ngram_range = ?params.ngram_range(),
            "TfidfVectorizer assembled"
        );
        Ok(Self { params, vocab, idf })
    }

    /// Transform one text into a sparse L2-normalised TF-IDF row.
    pub fn transform_one(&self, text: &str) -> CsVec<f64> {
        let row = self.weighted_row(text);
        let (indices, data): (Vec<usize>, Vec<f64>) = row.into_iter().unzip();
        CsVec::new(self.num_features(), indices, data)
    }

    /// Transform a batch of texts into a CSR matrix with one row per text.
    pub fn transform<T: AsRef<str> + Sync>(&self, texts: &[T]) -> CsMat<f64> {
        debug!(
            num_texts = texts.len(),
            "Transforming texts using TfidfVectorizer"
        );
        let rows: Vec<Vec<(usize, f64)>> = if should_use_parallel(texts) {
            debug!(num_texts = texts.len(), "Using parallel transform");
            texts
                .par_iter()
                .map(|text| self.weighted_row(text.as_ref()))
                .collect()
        } else {
            texts
                .iter()
                .map(|text| self.weighted_row(text.as_ref()))
                .collect()
        };

        // Build CSR format directly
        let mut indptr = Vec::with_capacity(texts.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();

        indptr.push(0);
        for row in rows {
            for (col_idx, value) in row {
                indices.push(col_idx);
                data.push(value);
            }
            indptr.push(indices.len());
        }

        debug!(
            non_zero_entries = data.len(),
            "Text transformation complete"
        );
        CsMat::new((texts.len(), self.num_features()), indptr, indices, data)
    }

    /// TF-IDF weights for one text as `(column, weight)` pairs sorted by
    /// column. Unseen terms are dropped; the surviving weights are L2
    /// normalised.
    fn weighted_row(&self, text: &str) -> Vec<(usize, f64)> {
        let tokens = ngrams::candidate_tokens(text, &self.params);
        let counts = ngrams::count_ngrams(&tokens, self.params.ngram_counts());

        let mut entries = counts
            .iter()
            .filter_map(|(term, &count)| {
                self.vocab.get(term).map(|&col_idx| {
                    let tf = if self.params.sublinear_tf() {
                        1.0 + (count as f64).ln()
                    } else {
                        count as f64
                    };
                    (col_idx, tf * self.idf[col_idx])
                })
            })
            .collect::<Vec<_>>();
        entries.sort_unstable_by_key(|&(col_idx, _)| col_idx);

        // Normalize row vector (L2 norm)
        let norm = entries.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, val) in &mut entries {
                *val /= norm;
            }
        }
        entries
    }

    pub fn num_features(&self) -> usize {
        self.vocab.len()
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocab
    }

    /// Vocabulary terms ordered by column index.
    ///
    /// Would be nice to cache this but it makes serialization more complex,
    /// and callers only need it once at load time.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec![String::new(); self.vocab.len()];
        for (term, &idx) in &self.vocab {
            names[idx] = term.clone();
        }
        names
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }

    #[cfg(feature = "bincode")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VectorizerError> {
        let (decoded, _): (Self, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())?;
        // Re-validate: the bytes may come from anywhere.
        Self::from_parts(decoded.params, decoded.vocab, decoded.idf)
    }

    #[cfg(feature = "bincode")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, VectorizerError> {
        Ok(bincode::encode_to_vec(self, bincode::config::standard())?)
    }
}

/// Determine if parallel processing should be used based on workload
/// characteristics: many texts, or a large total character count.
#[inline]
fn should_use_parallel<T: AsRef<str>>(texts: &[T]) -> bool {
    let num_texts = texts.len();

    if num_texts >= MIN_TEXTS_FOR_PARALLEL {
        return true;
    }

    // For fewer texts, estimate total workload from a sample
    let total_chars: usize = if num_texts > 20 {
        let sample_chars: usize = texts.iter().take(20).map(|s| s.as_ref().len()).sum();
        (sample_chars * num_texts) / 20
    } else {
        texts.iter().map(|s| s.as_ref().len()).sum()
    };

    total_chars >= MIN_CHARS_FOR_PARALLEL
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn vocab_from(terms: &[&str]) -> HashMap<String, usize> {
        terms
            .iter()
            .enumerate()
            .map(|(idx, term)| ((*term).to_string(), idx))
            .collect()
    }

    fn fixture() -> TfidfVectorizer {
        let vocab = vocab_from(&["cat", "cat mat", "dog", "mat"]);
        TfidfVectorizer::from_parts(
            VectorizerParams::default(),
            vocab,
            vec![1.0, 2.0, 1.5, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn from_parts_rejects_idf_length_mismatch() {
        let result = TfidfVectorizer::from_parts(
            VectorizerParams::default(),
            vocab_from(&["cat", "dog"]),
            vec![1.0],
        );
        assert!(matches!(result, Err(VectorizerError::IdfLength { .. })));
    }

    #[test]
    fn from_parts_rejects_sparse_indices() {
        let mut vocab = HashMap::default();
        vocab.insert("cat".to_string(), 0);
        vocab.insert("dog".to_string(), 2);
        let result =
            TfidfVectorizer::from_parts(VectorizerParams::default(), vocab, vec![1.0, 1.0]);
        assert!(matches!(
            result,
            Err(VectorizerError::VocabularyIndices { .. })
        ));
    }

    #[test]
    fn transform_one_weights_and_normalises() {
        let vectorizer = fixture();

        // "the" is stopped, leaving tokens [cat, mat]; known terms are
        // "cat" (idf 1.0), "mat" (idf 1.0) and the bigram "cat mat" (idf 2.0).
        let row = vectorizer.transform_one("the cat mat");
        assert_eq!(row.dim(), 4);
        assert_eq!(row.nnz(), 3);

        let norm = (1.0f64 + 4.0 + 1.0).sqrt();
        assert!((row.get(0).copied().unwrap() - 1.0 / norm).abs() < EPS);
        assert!((row.get(1).copied().unwrap() - 2.0 / norm).abs() < EPS);
        assert!((row.get(3).copied().unwrap() - 1.0 / norm).abs() < EPS);

        let l2: f64 = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        assert!((l2 - 1.0).abs() < EPS);
    }

    #[test]
    fn unseen_terms_are_dropped() {
        let vectorizer = fixture();
        let row = vectorizer.transform_one("zebra quagga");
        assert_eq!(row.nnz(), 0);
        assert_eq!(row.dim(), 4);
    }

    #[test]
    fn empty_text_yields_empty_row() {
        let vectorizer = fixture();
        let row = vectorizer.transform_one("");
        assert_eq!(row.nnz(), 0);
    }

    #[test]
    fn repeated_terms_raise_term_frequency() {
        let vectorizer = fixture();
        let once = vectorizer.transform_one("dog");
        let twice = vectorizer.transform_one("dog dog");
        // Single-entry rows L2-normalise to 1.0 regardless of count.
        assert!((once.get(2).copied().unwrap() - 1.0).abs() < EPS);
        assert!((twice.get(2).copied().unwrap() - 1.0).abs() < EPS);

        // Against another term the doubled count shifts the balance.
        let mixed = vectorizer.transform_one("dog dog cat");
        let dog_weight = mixed.get(2).copied().unwrap();
        let cat_weight = mixed.get(0).copied().unwrap();
        assert!(dog_weight > cat_weight);
    }

    #[test]
    fn transform_matches_transform_one_per_row() {
        let vectorizer = fixture();
        let texts = ["the cat mat", "dog", ""];
        let matrix = vectorizer.transform(&texts);
        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.cols(), 4);

        for (row_idx, row) in matrix.outer_iterator().enumerate() {
            let single = vectorizer.transform_one(texts[row_idx]);
            assert_eq!(row.nnz(), single.nnz());
            for (col_idx, value) in row.iter() {
                assert!((value - single.get(col_idx).copied().unwrap()).abs() < EPS);
            }
        }
    }

    #[test]
    fn transform_is_deterministic() {
        let vectorizer = fixture();
        let a = vectorizer.transform_one("the cat mat dog");
        let b = vectorizer.transform_one("the cat mat dog");
        assert_eq!(a.indices(), b.indices());
        for (x, y) in a.data().iter().zip(b.data()) {
            assert!((x - y).abs() < EPS);
        }
    }

    #[test]
    fn feature_names_follow_column_order() {
        let vectorizer = fixture();
        assert_eq!(vectorizer.feature_names(), vec!["cat", "cat mat", "dog", "mat"]);
    }

    #[test]
    fn small_workloads_stay_sequential() {
        assert!(!should_use_parallel(&["short text"]));
        let many: Vec<&str> = std::iter::repeat_n("x", 100).collect();
        assert!(should_use_parallel(&many));
    }

    #[cfg(feature = "bincode")]
    #[test]
    fn bytes_round_trip() {
        let vectorizer = fixture();
        let bytes = vectorizer.to_bytes().unwrap();
        let decoded = TfidfVectorizer::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.num_features(), vectorizer.num_features());
        let row = decoded.transform_one("the cat mat");
        assert_eq!(row.nnz(), 3);
    }
}
