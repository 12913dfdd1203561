//! Classification history: a pure observer over results.
//!
//! The pipeline never reads history back; sinks only record. Anything
//! implementing [`HistorySink`] can be wired in; the shipped
//! [`InMemoryHistory`] keeps a newest-first list for the process lifetime.

use std::sync::Mutex;

use chrono::Local;

use crate::result::{OriginLabel, PredictionResult};

/// Preview length stored per entry, in characters.
pub const PREVIEW_MAX_CHARS: usize = 120;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One recorded classification.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    /// Leading slice of the input, at most [`PREVIEW_MAX_CHARS`] chars,
    /// with "..." appended when truncated.
    pub preview: String,
    pub label: OriginLabel,
    pub confidence: f64,
    /// Local wall-clock time, minute precision.
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(text: &str, result: &PredictionResult) -> Self {
        Self {
            preview: preview(text),
            label: result.label,
            confidence: result.confidence,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_MAX_CHARS).collect();
    if text.chars().nth(PREVIEW_MAX_CHARS).is_some() {
        out.push_str("...");
    }
    out
}

/// Observer over classification results.
pub trait HistorySink: Send + Sync {
    fn record(&self, entry: HistoryEntry);
}

/// Process-local history, newest first. Cheap enough to clone out whole
/// for display.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl InMemoryHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries, newest first.
    #[must_use]
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().unwrap().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistorySink for InMemoryHistory {
    fn record(&self, entry: HistoryEntry) {
        self.entries.lock().unwrap().insert(0, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::AttributionSource;

    fn result(label: OriginLabel, confidence: f64) -> PredictionResult {
        PredictionResult {
            label,
            confidence,
            attribution: Vec::new(),
            attribution_source: AttributionSource::Suppressed,
            stylometry: None,
        }
    }

    #[test]
    fn short_text_preview_is_verbatim() {
        let entry = HistoryEntry::new("a short note", &result(OriginLabel::Human, 0.9));
        assert_eq!(entry.preview, "a short note");
    }

    #[test]
    fn long_text_preview_is_truncated_with_ellipsis() {
        let text = "x".repeat(200);
        let entry = HistoryEntry::new(&text, &result(OriginLabel::Ai, 0.8));
        assert_eq!(entry.preview.chars().count(), PREVIEW_MAX_CHARS + 3);
        assert!(entry.preview.ends_with("..."));
    }

    #[test]
    fn preview_at_exactly_the_limit_is_not_truncated() {
        let text = "y".repeat(PREVIEW_MAX_CHARS);
        let entry = HistoryEntry::new(&text, &result(OriginLabel::Human, 0.9));
        assert_eq!(entry.preview, text);
    }

    #[test]
    fn entries_come_back_newest_first() {
        let history = InMemoryHistory::new();
        history.record(HistoryEntry::new("first", &result(OriginLabel::Human, 0.9)));
        history.record(HistoryEntry::new("second", &result(OriginLabel::Ai, 0.8)));

        let entries = history.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].preview, "second");
        assert_eq!(entries[1].preview, "first");
    }

    #[test]
    fn entry_carries_label_and_confidence() {
        let entry = HistoryEntry::new("text", &result(OriginLabel::LlmRewritten, 0.7123));
        assert_eq!(entry.label, OriginLabel::LlmRewritten);
        assert_eq!(entry.confidence, 0.7123);
        // "%Y-%m-%d %H:%M" renders to 16 chars.
        assert_eq!(entry.timestamp.len(), 16);
    }
}
