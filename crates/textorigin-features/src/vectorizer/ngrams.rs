use ahash::HashMap;

use super::{params::VectorizerParams, stop_words};
use crate::text;

/// Tokens eligible for n-gram windowing: case-folded words, minus tokens
/// shorter than the configured minimum and (when enabled) stop words.
///
/// Filtering must happen before windowing, so that n-grams span the gaps
/// removed tokens leave behind. "the cat on the mat" therefore yields the
/// bigram "cat mat".
pub fn candidate_tokens(input: &str, params: &VectorizerParams) -> Vec<String> {
    text::words(input)
        .into_iter()
        .filter(|w| w.chars().count() >= params.min_token_chars())
        .filter(|w| !params.strip_stop_words() || !stop_words::is_stop_word(w))
        .collect()
}

/// Count space-joined n-grams of every configured size over the token list.
pub fn count_ngrams(tokens: &[String], ngram_counts: &[usize]) -> HashMap<String, usize> {
    let mut counter = HashMap::default();

    for &n in ngram_counts {
        for window in tokens.windows(n) {
            *counter.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    counter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn stop_words_are_removed_before_windowing() {
        let params = VectorizerParams::default();
        let candidates = candidate_tokens("the cat on the mat", &params);
        assert_eq!(candidates, tokens(&["cat", "mat"]));

        let counts = count_ngrams(&candidates, params.ngram_counts());
        assert_eq!(counts.get("cat mat"), Some(&1));
        assert!(!counts.contains_key("cat on"));
    }

    #[test]
    fn short_tokens_are_dropped() {
        let params = VectorizerParams::new(1..=1, 2, false, 1, None, false);
        let candidates = candidate_tokens("a b cat", &params);
        assert_eq!(candidates, tokens(&["cat"]));
    }

    #[test]
    fn unigram_counts_accumulate() {
        let counts = count_ngrams(&tokens(&["cat", "dog", "cat"]), &[1]);
        assert_eq!(counts.get("cat"), Some(&2));
        assert_eq!(counts.get("dog"), Some(&1));
    }

    #[test]
    fn trigram_window_spans_three_tokens() {
        let counts = count_ngrams(&tokens(&["quick", "brown", "fox"]), &[1, 2, 3]);
        assert_eq!(counts.len(), 6);
        assert_eq!(counts.get("quick brown fox"), Some(&1));
    }

    #[test]
    fn window_larger_than_input_yields_nothing() {
        let counts = count_ngrams(&tokens(&["cat"]), &[2]);
        assert!(counts.is_empty());
    }
}
