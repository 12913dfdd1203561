//! Chunked classification for long documents: fixed word windows, a
//! majority vote over per-window labels and a mean confidence.

use tracing::debug;

use crate::policy::{DetectorConfig, round4};
use crate::result::OriginLabel;

/// Split a document into contiguous word windows.
///
/// Windows hold `chunk_window_words` whitespace-separated words each; a
/// final partial window survives only at `chunk_min_final_words` or more.
/// If nothing qualifies, the whole text is returned as a single chunk so
/// every document classifies to something.
pub fn split_into_chunks(text: &str, config: &DetectorConfig) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut chunks: Vec<String> = words
        .chunks(config.chunk_window_words)
        .map(|window| window.join(" "))
        .collect();

    let trailing = words.len() % config.chunk_window_words;
    if trailing > 0 && trailing < config.chunk_min_final_words {
        chunks.pop();
    }
    if chunks.is_empty() {
        chunks.push(text.to_string());
    }

    debug!(
        num_words = words.len(),
        num_chunks = chunks.len(),
        "document split into chunks"
    );
    chunks
}

/// Majority vote over chunk labels, plus the mean chunk confidence
/// rounded to 4 decimals.
///
/// Ties are broken deterministically: among tied labels, the one whose
/// first occurrence in chunk order is earliest wins. Chunks are processed
/// left to right, so the outcome is reproducible.
pub fn aggregate_votes(labels: &[OriginLabel], confidences: &[f64]) -> (OriginLabel, f64) {
    debug_assert!(!labels.is_empty());
    debug_assert_eq!(labels.len(), confidences.len());

    // Counts in first-occurrence order.
    let mut counts: Vec<(OriginLabel, usize)> = Vec::new();
    for &label in labels {
        match counts.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }

    // Strictly-greater comparison keeps the earliest label on ties.
    let mut winner = counts[0];
    for &(label, count) in &counts[1..] {
        if count > winner.1 {
            winner = (label, count);
        }
    }

    let mean = confidences.iter().sum::<f64>() / confidences.len() as f64;
    (winner.0, round4(mean))
}
