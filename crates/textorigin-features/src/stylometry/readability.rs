//! Flesch readability scores.
//!
//! Syllables are estimated with the usual vowel-group heuristic: count
//! maximal vowel runs, drop a silent final "e" (but keep consonant + "le"),
//! floor at one syllable per word.

const FLESCH_BASE: f64 = 206.835;
const FLESCH_SENTENCE_WEIGHT: f64 = 1.015;
const FLESCH_SYLLABLE_WEIGHT: f64 = 84.6;

const KINCAID_SENTENCE_WEIGHT: f64 = 0.39;
const KINCAID_SYLLABLE_WEIGHT: f64 = 11.8;
const KINCAID_BASE: f64 = 15.59;

/// Estimate the syllable count of a single case-folded word.
pub fn syllable_count(word: &str) -> usize {
    let letters: Vec<char> = word.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if letters.is_empty() {
        return 0;
    }

    let mut groups = 0usize;
    let mut in_group = false;
    for &ch in &letters {
        if is_vowel(ch) {
            if !in_group {
                groups += 1;
            }
            in_group = true;
        } else {
            in_group = false;
        }
    }

    // Silent final "e": "table" keeps its "-le" syllable, "queue" does not
    // gain one from its trailing "e".
    let n = letters.len();
    if n >= 2 && letters[n - 1] == 'e' && !is_vowel(letters[n - 2]) {
        let keeps_le = n >= 3 && letters[n - 2] == 'l' && !is_vowel(letters[n - 3]);
        if !keeps_le {
            groups = groups.saturating_sub(1);
        }
    }

    groups.max(1)
}

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Flesch reading ease over pre-tokenized words. Higher is easier; roughly
/// 0-100 for ordinary prose. Returns 0.0 when there are no words or no
/// sentences.
pub fn flesch_reading_ease(words: &[String], sentence_count: usize) -> f64 {
    let Some((words_per_sentence, syllables_per_word)) = rates(words, sentence_count) else {
        return 0.0;
    };
    FLESCH_BASE
        - FLESCH_SENTENCE_WEIGHT * words_per_sentence
        - FLESCH_SYLLABLE_WEIGHT * syllables_per_word
}

/// Flesch-Kincaid grade level. Can go negative for trivially simple text,
/// matching the standard formula. Returns 0.0 when there are no words or no
/// sentences.
pub fn flesch_kincaid_grade(words: &[String], sentence_count: usize) -> f64 {
    let Some((words_per_sentence, syllables_per_word)) = rates(words, sentence_count) else {
        return 0.0;
    };
    KINCAID_SENTENCE_WEIGHT * words_per_sentence
        + KINCAID_SYLLABLE_WEIGHT * syllables_per_word
        - KINCAID_BASE
}

fn rates(words: &[String], sentence_count: usize) -> Option<(f64, f64)> {
    if words.is_empty() || sentence_count == 0 {
        return None;
    }
    let total_syllables: usize = words.iter().map(|w| syllable_count(w)).sum();
    let words_per_sentence = words.len() as f64 / sentence_count as f64;
    let syllables_per_word = total_syllables as f64 / words.len() as f64;
    Some((words_per_sentence, syllables_per_word))
}
