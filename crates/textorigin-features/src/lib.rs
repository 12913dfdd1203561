//! Feature extraction for textorigin.
//!
//! Turns raw text into the model input the origin classifier was trained
//! on: an L2-normalised TF-IDF n-gram block followed by a fixed block of
//! stylometric descriptors. Everything here is deterministic and fit-free;
//! fitted state arrives as artifacts.

mod assemble;
pub mod stylometry;
pub mod text;
pub mod vectorizer;

pub use assemble::{FeatureVector, assemble};
pub use stylometry::{FEATURE_NAMES, STYLOMETRIC_DIM, StylometricProfile};
pub use vectorizer::{TfidfVectorizer, VectorizerError, VectorizerParams};
