//! Decision policy: the rules layered on top of raw class probabilities.
//!
//! Every threshold lives here as a named constant, collected into
//! [`DetectorConfig`] so callers can tune one without touching the rest.

use crate::result::OriginLabel;

/// Below this top probability the label becomes Uncertain.
pub const UNCERTAINTY_CONFIDENCE_FLOOR: f64 = 0.70;
/// Below this gap between the top two probabilities the label becomes
/// Uncertain.
pub const UNCERTAINTY_MARGIN_FLOOR: f64 = 0.15;
/// Inputs with fewer whitespace-separated words get no attribution and no
/// rewrite scan.
pub const SHORT_TEXT_WORDS: usize = 12;

/// Documents with at least this many whitespace-separated words qualify
/// for chunked classification.
pub const CHUNK_MIN_WORDS: usize = 120;
/// Chunk window size, in words.
pub const CHUNK_WINDOW_WORDS: usize = 200;
/// A final partial window is kept only at or above this many words.
pub const CHUNK_MIN_FINAL_WORDS: usize = 60;

/// Attribution entries with smaller absolute impact are noise.
pub const ATTRIBUTION_MIN_IMPACT: f64 = 1e-6;
/// Number of attribution entries reported.
pub const ATTRIBUTION_TOP_K: usize = 10;
/// Attribution tokens shorter than this many chars are dropped.
pub const ATTRIBUTION_MIN_TOKEN_CHARS: usize = 3;

/// Sentence fragments at or below this many chars are ignored by the
/// rewrite scan.
pub const REWRITE_MIN_FRAGMENT_CHARS: usize = 5;
/// A fragment reads human-like below this word count...
pub const REWRITE_HUMAN_MAX_WORDS: usize = 12;
/// ...and below this mean word length.
pub const REWRITE_HUMAN_MAX_MEAN_LEN: f64 = 4.6;
/// A fragment reads machine-like above this word count...
pub const REWRITE_AI_MIN_WORDS: usize = 15;
/// ...and above this mean word length.
pub const REWRITE_AI_MIN_MEAN_LEN: f64 = 4.8;

/// Tunable policy knobs, defaulting to the shipped constants.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    pub confidence_floor: f64,
    pub margin_floor: f64,
    pub short_text_words: usize,
    pub chunk_min_words: usize,
    pub chunk_window_words: usize,
    pub chunk_min_final_words: usize,
    pub attribution_min_impact: f64,
    pub attribution_top_k: usize,
    pub attribution_min_token_chars: usize,
    pub rewrite: RewriteConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewriteConfig {
    pub min_fragment_chars: usize,
    pub human_max_words: usize,
    pub human_max_mean_len: f64,
    pub ai_min_words: usize,
    pub ai_min_mean_len: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_floor: UNCERTAINTY_CONFIDENCE_FLOOR,
            margin_floor: UNCERTAINTY_MARGIN_FLOOR,
            short_text_words: SHORT_TEXT_WORDS,
            chunk_min_words: CHUNK_MIN_WORDS,
            chunk_window_words: CHUNK_WINDOW_WORDS,
            chunk_min_final_words: CHUNK_MIN_FINAL_WORDS,
            attribution_min_impact: ATTRIBUTION_MIN_IMPACT,
            attribution_top_k: ATTRIBUTION_TOP_K,
            attribution_min_token_chars: ATTRIBUTION_MIN_TOKEN_CHARS,
            rewrite: RewriteConfig::default(),
        }
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            min_fragment_chars: REWRITE_MIN_FRAGMENT_CHARS,
            human_max_words: REWRITE_HUMAN_MAX_WORDS,
            human_max_mean_len: REWRITE_HUMAN_MAX_MEAN_LEN,
            ai_min_words: REWRITE_AI_MIN_WORDS,
            ai_min_mean_len: REWRITE_AI_MIN_MEAN_LEN,
        }
    }
}

impl DetectorConfig {
    #[must_use]
    pub fn with_confidence_floor(mut self, floor: f64) -> Self {
        self.confidence_floor = floor;
        self
    }

    #[must_use]
    pub fn with_margin_floor(mut self, floor: f64) -> Self {
        self.margin_floor = floor;
        self
    }
}

/// The label decision for one probability vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Argmax class index, also the explanation target. Unchanged by the
    /// uncertainty override.
    pub class_idx: usize,
    pub label: OriginLabel,
    /// Top probability rounded to 4 decimals, kept even when the label is
    /// overridden to Uncertain.
    pub confidence: f64,
}

/// Apply the uncertainty rule to a probability vector.
///
/// `labels` maps class index to label in fitted order; `probabilities`
/// must be non-empty and the same length. Ties on the maximum go to the
/// lower class index.
pub fn decide(probabilities: &[f64], labels: &[OriginLabel], config: &DetectorConfig) -> Decision {
    debug_assert_eq!(probabilities.len(), labels.len());

    let (class_idx, p_max) = probabilities.iter().copied().enumerate().fold(
        (0, f64::NEG_INFINITY),
        |best, (idx, p)| if p > best.1 { (idx, p) } else { best },
    );
    let p_second = probabilities
        .iter()
        .copied()
        .enumerate()
        .filter(|&(idx, _)| idx != class_idx)
        .map(|(_, p)| p)
        .fold(0.0_f64, f64::max);

    let uncertain =
        p_max < config.confidence_floor || (p_max - p_second) < config.margin_floor;
    let label = if uncertain {
        OriginLabel::Uncertain
    } else {
        labels[class_idx]
    };

    Decision {
        class_idx,
        label,
        confidence: round4(p_max),
    }
}

/// Round to 4 decimal places, the precision of every reported number.
pub(crate) fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
