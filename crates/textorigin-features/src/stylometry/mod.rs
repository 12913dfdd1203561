//! Stylometric feature extraction.
//!
//! A [`StylometricProfile`] is a fixed, ordered set of handcrafted numeric
//! descriptors of a text. The field order of the struct, [`FEATURE_NAMES`]
//! and [`StylometricProfile::to_vector`] all follow the same canonical
//! order, and that order is part of the trained-model contract: the
//! classifier's feature columns were laid out with it, so reordering or
//! renaming a field silently corrupts every prediction.

mod pos;
mod readability;

pub use pos::{CoarseTag, tag};
pub use readability::{flesch_kincaid_grade, flesch_reading_ease, syllable_count};

use ahash::HashSet;

use crate::text;

/// Number of stylometric features, i.e. the width this profile contributes
/// to the assembled feature vector.
pub const STYLOMETRIC_DIM: usize = 15;

/// Canonical feature order shared between training-time extraction and
/// inference. Must match the field order of [`StylometricProfile`].
pub const FEATURE_NAMES: [&str; STYLOMETRIC_DIM] = [
    "word_count",
    "sentence_count",
    "char_count",
    "avg_word_length",
    "avg_sentence_length",
    "lexical_diversity",
    "noun_ratio",
    "verb_ratio",
    "adj_ratio",
    "adv_ratio",
    "flesch_reading_ease",
    "flesch_kincaid_grade",
    "function_word_ratio",
    "capital_ratio",
    "digit_ratio",
];

/// The closed function-word list used for `function_word_ratio`.
pub const FUNCTION_WORDS: [&str; 11] =
    ["the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for"];

/// Handcrafted numeric descriptors of a text. Recomputed fresh per input,
/// never cached or mutated after construction.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StylometricProfile {
    pub word_count: f64,
    pub sentence_count: f64,
    pub char_count: f64,
    pub avg_word_length: f64,
    pub avg_sentence_length: f64,
    pub lexical_diversity: f64,
    pub noun_ratio: f64,
    pub verb_ratio: f64,
    pub adj_ratio: f64,
    pub adv_ratio: f64,
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub function_word_ratio: f64,
    pub capital_ratio: f64,
    pub digit_ratio: f64,
}

impl StylometricProfile {
    /// Feature values in the canonical [`FEATURE_NAMES`] order.
    #[must_use]
    pub fn to_vector(&self) -> [f64; STYLOMETRIC_DIM] {
        [
            self.word_count,
            self.sentence_count,
            self.char_count,
            self.avg_word_length,
            self.avg_sentence_length,
            self.lexical_diversity,
            self.noun_ratio,
            self.verb_ratio,
            self.adj_ratio,
            self.adv_ratio,
            self.flesch_reading_ease,
            self.flesch_kincaid_grade,
            self.function_word_ratio,
            self.capital_ratio,
            self.digit_ratio,
        ]
    }

    /// (name, value) pairs in canonical order.
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_vector())
    }

    /// Copy with every value rounded to 4 decimal places, the precision
    /// reported in result records.
    #[must_use]
    pub fn rounded(&self) -> Self {
        let mut out = self.clone();
        for v in [
            &mut out.word_count,
            &mut out.sentence_count,
            &mut out.char_count,
            &mut out.avg_word_length,
            &mut out.avg_sentence_length,
            &mut out.lexical_diversity,
            &mut out.noun_ratio,
            &mut out.verb_ratio,
            &mut out.adj_ratio,
            &mut out.adv_ratio,
            &mut out.flesch_reading_ease,
            &mut out.flesch_kincaid_grade,
            &mut out.function_word_ratio,
            &mut out.capital_ratio,
            &mut out.digit_ratio,
        ] {
            *v = round4(*v);
        }
        out
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Extract the stylometric profile of a text.
///
/// Pure function of its input. Degenerate input (empty text, a single word,
/// no sentence terminators) yields zeroed ratios rather than an error:
/// every division is guarded on an empty denominator.
pub fn extract(input: &str) -> StylometricProfile {
    let words = text::words(input);
    let sentence_count = text::sentences(input).len();
    let word_count = words.len();
    let char_count = input.chars().count();

    let mut profile = StylometricProfile {
        word_count: word_count as f64,
        sentence_count: sentence_count as f64,
        char_count: char_count as f64,
        ..StylometricProfile::default()
    };

    if word_count > 0 {
        let total_word_chars: usize = words.iter().map(|w| w.chars().count()).sum();
        profile.avg_word_length = total_word_chars as f64 / word_count as f64;

        let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
        profile.lexical_diversity = unique.len() as f64 / word_count as f64;

        let mut nouns = 0usize;
        let mut verbs = 0usize;
        let mut adjectives = 0usize;
        let mut adverbs = 0usize;
        for word in &words {
            match pos::tag(word) {
                CoarseTag::Noun => nouns += 1,
                CoarseTag::Verb => verbs += 1,
                CoarseTag::Adjective => adjectives += 1,
                CoarseTag::Adverb => adverbs += 1,
                CoarseTag::Closed => {}
            }
        }
        profile.noun_ratio = nouns as f64 / word_count as f64;
        profile.verb_ratio = verbs as f64 / word_count as f64;
        profile.adj_ratio = adjectives as f64 / word_count as f64;
        profile.adv_ratio = adverbs as f64 / word_count as f64;

        let function_hits = words
            .iter()
            .filter(|w| FUNCTION_WORDS.contains(&w.as_str()))
            .count();
        profile.function_word_ratio = function_hits as f64 / word_count as f64;
    }

    if sentence_count > 0 {
        profile.avg_sentence_length = word_count as f64 / sentence_count as f64;
    }

    profile.flesch_reading_ease = readability::flesch_reading_ease(&words, sentence_count);
    profile.flesch_kincaid_grade = readability::flesch_kincaid_grade(&words, sentence_count);

    if char_count > 0 {
        let capitals = input.chars().filter(|c| c.is_uppercase()).count();
        let digits = input.chars().filter(|c| c.is_ascii_digit()).count();
        profile.capital_ratio = capitals as f64 / char_count as f64;
        profile.digit_ratio = digits as f64 / char_count as f64;
    }

    profile
}
