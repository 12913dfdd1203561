//! Origin classification for textorigin.
//!
//! Runs the full decision pipeline on top of [`textorigin_features`]:
//! load the fitted artifact bundle, score a text with the tree ensemble,
//! apply the uncertainty and short-text rules, attach a token
//! attribution, and (for long documents) aggregate chunk votes into a
//! single verdict. All classification entry points are infallible;
//! failures are confined to artifact loading.

mod artifacts;
mod chunk;
mod explain;
mod history;
mod model;
mod pipeline;
mod policy;
mod result;
mod rewrite;

pub use artifacts::{
    ArtifactBundle, ArtifactError, BundleInfo, CLASSIFIER_FILENAME, LABEL_ENCODER_FILENAME,
    VECTORIZER_FILENAME,
};
pub use chunk::{aggregate_votes, split_into_chunks};
pub use explain::{FALLBACK_ATTRIBUTION, explain, fallback_attribution};
pub use history::{HistoryEntry, HistorySink, InMemoryHistory, PREVIEW_MAX_CHARS};
pub use model::{
    DecisionTree, EncoderError, ForestClassifier, ForestError, LabelEncoder, OriginModel, TreeNode,
};
pub use pipeline::{classify, classify_long};
pub use policy::{
    ATTRIBUTION_MIN_IMPACT, ATTRIBUTION_MIN_TOKEN_CHARS, ATTRIBUTION_TOP_K, CHUNK_MIN_FINAL_WORDS,
    CHUNK_MIN_WORDS, CHUNK_WINDOW_WORDS, Decision, DetectorConfig, REWRITE_AI_MIN_MEAN_LEN,
    REWRITE_AI_MIN_WORDS, REWRITE_HUMAN_MAX_MEAN_LEN, REWRITE_HUMAN_MAX_WORDS,
    REWRITE_MIN_FRAGMENT_CHARS, RewriteConfig, SHORT_TEXT_WORDS, UNCERTAINTY_CONFIDENCE_FLOOR,
    UNCERTAINTY_MARGIN_FLOOR, decide,
};
pub use result::{AttributionSource, OriginLabel, PredictionResult, TokenImpact, UnknownLabel};
pub use rewrite::is_mixed_style;

pub use textorigin_features::{
    FEATURE_NAMES, STYLOMETRIC_DIM, StylometricProfile, TfidfVectorizer, VectorizerParams,
};
