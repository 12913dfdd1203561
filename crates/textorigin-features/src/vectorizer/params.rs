use std::ops::RangeInclusive;

/// Smallest n-gram size in the fitted contract.
pub const DEFAULT_MIN_NGRAM: usize = 1;
/// Largest n-gram size in the fitted contract.
pub const DEFAULT_MAX_NGRAM: usize = 3;
/// Tokens shorter than this (in chars) are discarded before windowing.
pub const DEFAULT_MIN_TOKEN_CHARS: usize = 2;
/// Fit-time vocabulary cap recorded in the artifact.
pub const DEFAULT_MAX_FEATURES: usize = 20_000;
/// Fit-time minimum document frequency recorded in the artifact.
pub const DEFAULT_MIN_DF: usize = 3;

#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorizerParams {
    ngram_range: Vec<usize>,
    /// Minimum token length in characters. Shorter tokens are dropped
    /// before n-gram windowing.
    min_token_chars: usize,
    /// Drop English stop words before n-gram windowing, so windows span
    /// the gaps they leave.
    strip_stop_words: bool,
    /// Minimum document frequency applied when the vocabulary was fitted.
    /// Recorded for provenance; transform never consults it.
    min_df: usize,
    /// Vocabulary size cap applied when the vocabulary was fitted.
    /// Recorded for provenance; transform never consults it.
    max_features: Option<usize>,
    /// Replace term frequency `tf` with `1 + ln(tf)` before IDF weighting.
    sublinear_tf: bool,
}

impl VectorizerParams {
    pub fn new(
        ngram_range: impl Into<RangeInclusive<usize>>,
        min_token_chars: usize,
        strip_stop_words: bool,
        min_df: usize,
        max_features: Option<usize>,
        sublinear_tf: bool,
    ) -> Self {
        let n_sizes = ngram_range.into().collect::<Vec<_>>();
        assert!(
            !n_sizes.is_empty(),
            "ngram_range must contain at least one value"
        );
        assert!(
            n_sizes.iter().all(|&n| n >= 1),
            "ngram sizes must be >= 1"
        );
        Self {
            ngram_range: n_sizes,
            min_token_chars,
            strip_stop_words,
            min_df,
            max_features,
            sublinear_tf,
        }
    }

    #[must_use]
    pub fn ngram_counts(&self) -> &[usize] {
        &self.ngram_range
    }

    #[must_use]
    pub fn ngram_range(&self) -> (usize, usize) {
        (
            *self.ngram_range.first().expect("ngram_range is not empty"),
            *self.ngram_range.last().expect("ngram_range is not empty"),
        )
    }

    #[must_use]
    pub fn min_token_chars(&self) -> usize {
        self.min_token_chars
    }

    #[must_use]
    pub fn strip_stop_words(&self) -> bool {
        self.strip_stop_words
    }

    #[must_use]
    pub fn min_df(&self) -> usize {
        self.min_df
    }

    #[must_use]
    pub fn max_features(&self) -> Option<usize> {
        self.max_features
    }

    #[must_use]
    pub fn sublinear_tf(&self) -> bool {
        self.sublinear_tf
    }
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_NGRAM..=DEFAULT_MAX_NGRAM,
            DEFAULT_MIN_TOKEN_CHARS,
            true,
            DEFAULT_MIN_DF,
            Some(DEFAULT_MAX_FEATURES),
            false,
        )
    }
}
