//! TF-IDF vectorization over word-level n-grams.
//!
//! The vectorizer here is transform-only: the vocabulary, IDF table and
//! parameters are fitted offline and shipped as an artifact.

mod ngrams;
mod params;
mod stop_words;
mod tfidf;

pub use params::{
    DEFAULT_MAX_FEATURES, DEFAULT_MAX_NGRAM, DEFAULT_MIN_DF, DEFAULT_MIN_NGRAM,
    DEFAULT_MIN_TOKEN_CHARS, VectorizerParams,
};
pub use stop_words::{ENGLISH_STOP_WORDS, is_stop_word};
pub use tfidf::{TfidfVectorizer, VectorizerError};
