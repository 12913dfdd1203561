//! # textorigin
//!
//! Classify the origin of a text: human-written, AI-generated or
//! LLM-rewritten.
//!
//! Classification runs entirely in-process on fitted artifacts (a TF-IDF
//! vectorizer, a decision forest and a label encoder) loaded from a
//! directory at startup. Every prediction carries a confidence score, a
//! token-level attribution and a stylometric profile of the input.
//!
//! ## Quick Start
//!
//! ```no_run
//! use textorigin::Detector;
//!
//! let detector = Detector::from_artifacts("model_artifacts")?;
//!
//! let result = detector.classify("Some text to analyze");
//! println!("{} ({:.1}%)", result.label, result.confidence * 100.0);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Custom Policy
//!
//! ```no_run
//! use textorigin::{Detector, DetectorConfig};
//!
//! // Demand more confidence before committing to a label
//! let config = DetectorConfig::default()
//!     .with_confidence_floor(0.8)
//!     .with_margin_floor(0.2);
//! let detector = Detector::from_artifacts("model_artifacts")?.with_config(config);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Long Documents and Batches
//!
//! ```no_run
//! use textorigin::Detector;
//!
//! let detector = Detector::from_artifacts("model_artifacts")?;
//!
//! // Windows the document, classifies each window and majority-votes
//! let essay = std::fs::read_to_string("essay.txt")?;
//! let verdict = detector.classify_long(&essay);
//!
//! let texts = vec!["First text", "Second text", "Third text"];
//! let results = detector.classify_batch(&texts);
//! # Ok::<(), anyhow::Error>(())
//! ```

#[cfg(feature = "cli")]
pub mod cli;

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

pub use textorigin_inference::{
    ArtifactBundle, ArtifactError, AttributionSource, BundleInfo, CLASSIFIER_FILENAME,
    DecisionTree, DetectorConfig, FEATURE_NAMES, ForestClassifier, HistoryEntry, HistorySink,
    InMemoryHistory, LABEL_ENCODER_FILENAME, LabelEncoder, OriginLabel, OriginModel,
    PredictionResult, RewriteConfig, STYLOMETRIC_DIM, StylometricProfile, TfidfVectorizer,
    TokenImpact, TreeNode, VECTORIZER_FILENAME, VectorizerParams,
};

/// Minimum number of texts to consider parallelization
const MIN_TEXTS_FOR_PARALLEL: usize = 100;

/// Minimum total character count to consider parallelization
const MIN_CHARS_FOR_PARALLEL: usize = 10_000;

/// Configured entry point for origin classification.
///
/// Holds the artifact bundle behind an [`Arc`], so cloning a detector is
/// cheap and clones can be shared across threads.
///
/// # Examples
///
/// ```no_run
/// use textorigin::Detector;
///
/// let detector = Detector::from_artifacts("model_artifacts")?;
/// let result = detector.classify("some text");
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Clone)]
pub struct Detector {
    bundle: Arc<ArtifactBundle>,
    config: DetectorConfig,
    history: Option<Arc<dyn HistorySink>>,
}

impl Detector {
    /// Load the fitted artifacts from `dir` and build a detector with the
    /// default decision policy.
    pub fn from_artifacts(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        Ok(Self::new(ArtifactBundle::load(dir)?))
    }

    /// Build a detector from an already loaded bundle.
    #[must_use]
    pub fn new(bundle: ArtifactBundle) -> Self {
        Self {
            bundle: Arc::new(bundle),
            config: DetectorConfig::default(),
            history: None,
        }
    }

    /// Replace the decision policy.
    #[must_use]
    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Record every prediction into `sink`, newest first.
    #[must_use]
    pub fn with_history(mut self, sink: Arc<dyn HistorySink>) -> Self {
        self.history = Some(sink);
        self
    }

    /// The decision policy in effect.
    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// The loaded artifact bundle.
    #[must_use]
    pub fn bundle(&self) -> &ArtifactBundle {
        &self.bundle
    }

    /// Summary of the loaded artifacts.
    #[must_use]
    pub fn artifact_info(&self) -> BundleInfo {
        self.bundle.info()
    }

    /// Classify a single text.
    pub fn classify<T: AsRef<str>>(&self, text: T) -> PredictionResult {
        let text = text.as_ref();
        let result = textorigin_inference::classify(&self.bundle, &self.config, text);
        self.record(text, &result);
        result
    }

    /// Classify a long document.
    ///
    /// Documents past the chunking threshold are split into word windows,
    /// each window is classified on its own and the verdicts are
    /// majority-voted. Shorter inputs take the same path as
    /// [`classify`](Self::classify).
    pub fn classify_long<T: AsRef<str>>(&self, text: T) -> PredictionResult {
        let text = text.as_ref();
        let result = textorigin_inference::classify_long(&self.bundle, &self.config, text);
        self.record(text, &result);
        result
    }

    /// Classify many texts, in parallel when the workload warrants it.
    ///
    /// Results come back in input order; history entries are recorded in
    /// input order as well, regardless of how the work was scheduled.
    pub fn classify_batch<T: AsRef<str> + Sync>(&self, texts: &[T]) -> Vec<PredictionResult> {
        let results: Vec<PredictionResult> = if should_use_parallel(texts) {
            debug!(num_texts = texts.len(), "Using parallel batch classification");
            texts
                .par_iter()
                .map(|text| textorigin_inference::classify(&self.bundle, &self.config, text.as_ref()))
                .collect()
        } else {
            texts
                .iter()
                .map(|text| textorigin_inference::classify(&self.bundle, &self.config, text.as_ref()))
                .collect()
        };

        if self.history.is_some() {
            for (text, result) in texts.iter().zip(&results) {
                self.record(text.as_ref(), result);
            }
        }
        results
    }

    fn record(&self, text: &str, result: &PredictionResult) {
        if let Some(history) = &self.history {
            history.record(HistoryEntry::new(text, result));
        }
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
