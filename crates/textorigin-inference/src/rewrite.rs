//! Rewrite heuristic: a cheap stylistic scan for documents that mix
//! casual human-sounding sentences with long formal machine-sounding ones,
//! the signature of an LLM pass over human notes.
//!
//! The scan only ever overrides the label to LLM-Rewritten; confidence and
//! attribution are untouched. It runs on the primary path only: short
//! texts skip it, and the chunk pipeline never calls it.

use crate::policy::RewriteConfig;

/// Whether the text contains at least one human-like and at least one
/// machine-like sentence fragment.
///
/// Fragments come from a naive split on `.`, `!`, `?`; fragments of
/// `min_fragment_chars` or fewer are ignored. A fragment is human-like
/// below the word-count and mean-word-length bounds, machine-like above
/// both of the larger bounds. All comparisons are strict.
pub fn is_mixed_style(text: &str, config: &RewriteConfig) -> bool {
    let mut has_human = false;
    let mut has_machine = false;

    for fragment in text.split(['.', '!', '?']) {
        let fragment = fragment.trim();
        if fragment.chars().count() <= config.min_fragment_chars {
            continue;
        }
        let word_count = fragment.split_whitespace().count();
        if word_count == 0 {
            continue;
        }
        let total_chars: usize = fragment
            .split_whitespace()
            .map(|w| w.chars().count())
            .sum();
        let mean_word_len = total_chars as f64 / word_count as f64;

        if word_count < config.human_max_words && mean_word_len < config.human_max_mean_len {
            has_human = true;
        }
        if word_count > config.ai_min_words && mean_word_len > config.ai_min_mean_len {
            has_machine = true;
        }
        if has_human && has_machine {
            return true;
        }
    }
    false
}
