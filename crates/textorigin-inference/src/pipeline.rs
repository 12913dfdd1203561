//! The classification pipeline: feature extraction through decision
//! policy, explanation and the rewrite scan, in a fixed order.
//!
//! Everything here is stateless per call. The only shared state is the
//! read-only [`ArtifactBundle`], so calls may run concurrently without
//! locks.

use tracing::debug;

use textorigin_features::{assemble, stylometry};

use crate::artifacts::ArtifactBundle;
use crate::chunk;
use crate::explain;
use crate::policy::{DetectorConfig, decide};
use crate::result::{AttributionSource, OriginLabel, PredictionResult};
use crate::rewrite;

/// Classify one text on the primary path.
///
/// Rules applied in order: empty input short-circuits; short texts keep
/// their prediction but lose attribution and the rewrite scan; the
/// uncertainty rule may override the label; the rewrite scan runs last
/// and only ever changes the label to LLM-Rewritten.
pub fn classify(bundle: &ArtifactBundle, config: &DetectorConfig, text: &str) -> PredictionResult {
    classify_inner(bundle, config, text, true)
}

/// Classify a document, chunking it first when it is long enough.
///
/// Chunks are classified sequentially left to right (the vote tie-break
/// depends on chunk order) on the single-chunk pipeline, which excludes
/// the rewrite scan. The aggregate keeps the majority label, the mean
/// confidence, whole-document stylometry and no attribution.
pub fn classify_long(
    bundle: &ArtifactBundle,
    config: &DetectorConfig,
    text: &str,
) -> PredictionResult {
    if text.trim().is_empty() {
        debug!("empty input, returning default result");
        return PredictionResult::empty_input();
    }

    let word_count = text.split_whitespace().count();
    if word_count < config.chunk_min_words {
        debug!(word_count, "below chunking threshold, using primary path");
        return classify(bundle, config, text);
    }

    let chunks = chunk::split_into_chunks(text, config);
    let mut labels = Vec::with_capacity(chunks.len());
    let mut confidences = Vec::with_capacity(chunks.len());
    for chunk_text in &chunks {
        let result = classify_inner(bundle, config, chunk_text, false);
        labels.push(result.label);
        confidences.push(result.confidence);
    }
    let (label, confidence) = chunk::aggregate_votes(&labels, &confidences);
    debug!(
        num_chunks = chunks.len(),
        label = %label,
        confidence,
        "chunk votes aggregated"
    );

    PredictionResult {
        label,
        confidence,
        attribution: Vec::new(),
        attribution_source: AttributionSource::Suppressed,
        stylometry: Some(stylometry::extract(text).rounded()),
    }
}

fn classify_inner(
    bundle: &ArtifactBundle,
    config: &DetectorConfig,
    text: &str,
    rewrite_enabled: bool,
) -> PredictionResult {
    if text.trim().is_empty() {
        debug!("empty input, returning default result");
        return PredictionResult::empty_input();
    }

    let word_count = text.split_whitespace().count();
    let short_text = word_count < config.short_text_words;

    let profile = stylometry::extract(text);
    let lexical = bundle.vectorizer().transform_one(text);
    let features = assemble(lexical, &profile);
    let dense = features.to_dense();

    let probabilities = bundle.model().predict_proba(&dense);
    let decision = decide(&probabilities, bundle.labels(), config);
    debug!(
        label = %decision.label,
        confidence = decision.confidence,
        word_count,
        "decision made"
    );

    let (attribution, attribution_source) = if short_text {
        (Vec::new(), AttributionSource::Suppressed)
    } else {
        explain::explain(
            bundle.model(),
            &dense,
            decision.class_idx,
            bundle.feature_names(),
            config,
        )
    };

    let mut label = decision.label;
    if rewrite_enabled && !short_text && rewrite::is_mixed_style(text, &config.rewrite) {
        debug!("mixed sentence styles detected, overriding label");
        label = OriginLabel::LlmRewritten;
    }

    PredictionResult {
        label,
        confidence: decision.confidence,
        attribution,
        attribution_source,
        stylometry: Some(profile.rounded()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DecisionTree, ForestClassifier, LabelEncoder, TreeNode};
    use textorigin_features::{STYLOMETRIC_DIM, TfidfVectorizer, VectorizerParams};

    const VOCAB: [&str; 3] = ["analysis", "cat", "significant"];

    fn vectorizer() -> TfidfVectorizer {
        let vocab = VOCAB
            .iter()
            .enumerate()
            .map(|(idx, term)| ((*term).to_string(), idx))
            .collect();
        TfidfVectorizer::from_parts(VectorizerParams::default(), vocab, vec![1.0; 3]).unwrap()
    }

    fn bundle_with(tree: DecisionTree) -> ArtifactBundle {
        let forest = ForestClassifier::new(vec![tree], VOCAB.len() + STYLOMETRIC_DIM, 2).unwrap();
        let encoder =
            LabelEncoder::new(vec!["AI".to_string(), "Human".to_string()]).unwrap();
        ArtifactBundle::from_parts(vectorizer(), Box::new(forest), encoder).unwrap()
    }

    /// Splits on the word_count stylometric column (column 3 after the
    /// 3-token vocabulary): up to 20 words reads Human, more reads AI.
    fn word_count_bundle() -> ArtifactBundle {
        bundle_with(DecisionTree::new(vec![
            TreeNode::Split {
                feature: 3,
                threshold: 20.0,
                left: 1,
                right: 2,
                distribution: vec![1.0, 1.0],
            },
            TreeNode::Leaf {
                distribution: vec![0.0, 1.0],
            },
            TreeNode::Leaf {
                distribution: vec![1.0, 0.0],
            },
        ]))
    }

    /// Splits on the "analysis" vocabulary column: texts mentioning it
    /// lean AI 0.9, others lean Human 0.9.
    fn lexical_bundle() -> ArtifactBundle {
        bundle_with(DecisionTree::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold: 0.1,
                left: 1,
                right: 2,
                distribution: vec![1.0, 1.0],
            },
            TreeNode::Leaf {
                distribution: vec![1.0, 9.0],
            },
            TreeNode::Leaf {
                distribution: vec![9.0, 1.0],
            },
        ]))
    }

    /// Always predicts a flat 0.6 / 0.4 split.
    fn uncertain_bundle() -> ArtifactBundle {
        bundle_with(DecisionTree::new(vec![TreeNode::Leaf {
            distribution: vec![6.0, 4.0],
        }]))
    }

    #[test]
    fn empty_input_short_circuits() {
        let bundle = word_count_bundle();
        for text in ["", "   ", "\n\t"] {
            let result = classify(&bundle, &DetectorConfig::default(), text);
            assert_eq!(result, PredictionResult::empty_input());
        }
    }

    #[test]
    fn short_text_keeps_prediction_but_suppresses_attribution() {
        let bundle = word_count_bundle();
        let result = classify(&bundle, &DetectorConfig::default(), "just a few words here");
        assert_eq!(result.label, OriginLabel::Human);
        assert_eq!(result.confidence, 1.0);
        assert!(result.attribution.is_empty());
        assert_eq!(result.attribution_source, AttributionSource::Suppressed);
        assert!(result.stylometry.is_some());
    }

    #[test]
    fn stylometric_split_without_lexical_signal_falls_back() {
        let bundle = word_count_bundle();
        // 13 words, no vocabulary token: the only attribution lands on a
        // stylometric column, so nothing lexical survives filtering.
        let text = "one two three four five six seven eight nine ten eleven twelve thirteen";
        let result = classify(&bundle, &DetectorConfig::default(), text);
        assert_eq!(result.label, OriginLabel::Human);
        assert_eq!(result.attribution_source, AttributionSource::Fallback);
        assert_eq!(result.attribution.len(), 5);
        assert_eq!(result.attribution[0].token, "furthermore");
    }

    #[test]
    fn lexical_split_yields_model_attribution() {
        let bundle = lexical_bundle();
        let text = "the analysis was good and the analysis was right on the whole";
        assert!(text.split_whitespace().count() >= 12);

        let result = classify(&bundle, &DetectorConfig::default(), text);
        assert_eq!(result.label, OriginLabel::Ai);
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.attribution_source, AttributionSource::Model);
        assert_eq!(result.attribution[0].token, "analysis");
        // Root share of AI is 0.5, the taken leaf's is 0.9.
        assert_eq!(result.attribution[0].impact, 0.4);
    }

    #[test]
    fn flat_distribution_is_uncertain_but_keeps_confidence() {
        let bundle = uncertain_bundle();
        let text = "this text is long enough to pass the short text rule easily today";
        let result = classify(&bundle, &DetectorConfig::default(), text);
        assert_eq!(result.label, OriginLabel::Uncertain);
        assert_eq!(result.confidence, 0.6);
    }

    #[test]
    fn mixed_styles_override_the_label() {
        let bundle = word_count_bundle();
        let text = "The cat sat on the old red mat. Furthermore, the comprehensive \
            analysis demonstrates that sophisticated computational methodologies \
            consistently generate statistically significant improvements across \
            numerous experimental evaluation scenarios considered throughout this \
            investigation.";
        let result = classify(&bundle, &DetectorConfig::default(), text);
        assert_eq!(result.label, OriginLabel::LlmRewritten);
        // Confidence still comes from the model, not the heuristic.
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn classification_is_idempotent() {
        let bundle = lexical_bundle();
        let text = "the analysis was good and the analysis was right on the whole";
        let first = classify(&bundle, &DetectorConfig::default(), text);
        let second = classify(&bundle, &DetectorConfig::default(), text);
        assert_eq!(first, second);
    }

    #[test]
    fn below_chunk_threshold_uses_the_primary_path() {
        let bundle = word_count_bundle();
        let text = "The cat sat on the old red mat. Furthermore, the comprehensive \
            analysis demonstrates that sophisticated computational methodologies \
            consistently generate statistically significant improvements across \
            numerous experimental evaluation scenarios considered throughout this \
            investigation.";
        let long = classify_long(&bundle, &DetectorConfig::default(), text);
        let primary = classify(&bundle, &DetectorConfig::default(), text);
        // Short documents classify identically either way, rewrite included.
        assert_eq!(long, primary);
        assert_eq!(long.label, OriginLabel::LlmRewritten);
    }

    #[test]
    fn long_document_aggregates_chunk_votes() {
        let bundle = word_count_bundle();
        let text = (0..500).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let result = classify_long(&bundle, &DetectorConfig::default(), &text);
        // Three 200/200/100-word chunks, each well above the tree's
        // 20-word split, so every vote is AI at full confidence.
        assert_eq!(result.label, OriginLabel::Ai);
        assert_eq!(result.confidence, 1.0);
        assert!(result.attribution.is_empty());
        assert_eq!(result.attribution_source, AttributionSource::Suppressed);
        let stylometry = result.stylometry.expect("document stylometry");
        assert_eq!(stylometry.word_count, 500.0);
    }

    #[test]
    fn chunk_path_skips_the_rewrite_scan() {
        let bundle = word_count_bundle();
        // Repeat a mixed casual/formal pair until the document chunks.
        let pair = "The cat sat on the old red mat. Furthermore, the comprehensive \
            analysis demonstrates that sophisticated computational methodologies \
            consistently generate statistically significant improvements across \
            numerous experimental evaluation scenarios considered throughout this \
            investigation.";
        let text = std::iter::repeat_n(pair, 5).collect::<Vec<_>>().join(" ");
        assert!(text.split_whitespace().count() >= 120);

        let result = classify_long(&bundle, &DetectorConfig::default(), &text);
        assert_ne!(result.label, OriginLabel::LlmRewritten);
    }
}
