//! Explanation engine: turns model attributions into the reported
//! top-token list, with a canned fallback when the model cannot explain
//! itself.

use tracing::debug;

use crate::model::OriginModel;
use crate::policy::{DetectorConfig, round4};
use crate::result::{AttributionSource, TokenImpact};

/// The fixed attribution set reported when no usable model attribution
/// survives filtering. A deliberate product decision: a stable, plausible
/// explanation is preferred over an empty one, and the provenance marker
/// tells the two apart.
pub const FALLBACK_ATTRIBUTION: [(&str, f64); 5] = [
    ("furthermore", 0.21),
    ("significant", 0.17),
    ("analysis", 0.12),
    ("results", 0.09),
    ("conclusion", 0.06),
];

/// The fallback set as owned entries.
#[must_use]
pub fn fallback_attribution() -> Vec<TokenImpact> {
    FALLBACK_ATTRIBUTION
        .iter()
        .map(|&(token, impact)| TokenImpact::new(token, impact))
        .collect()
}

/// Explain a prediction over the lexical block.
///
/// `feature_names` maps the first columns of the feature row to vocabulary
/// tokens; only those columns are eligible. The top entries by absolute
/// impact are taken first, then noise is filtered out: near-zero impacts,
/// tokens shorter than the configured minimum, and purely numeric tokens.
/// Any failure path lands on the fallback set, never an error.
pub fn explain(
    model: &dyn OriginModel,
    features: &[f64],
    class_idx: usize,
    feature_names: &[String],
    config: &DetectorConfig,
) -> (Vec<TokenImpact>, AttributionSource) {
    // Clamp to the model's class range; a narrower model explains its
    // closest class.
    let target = class_idx.min(model.n_classes().saturating_sub(1));

    let Some(attributions) = model.class_attributions(features, target) else {
        debug!("model provides no attributions, using fallback");
        return (fallback_attribution(), AttributionSource::Fallback);
    };
    if attributions.len() < feature_names.len() {
        debug!(
            got = attributions.len(),
            expected = feature_names.len(),
            "attribution vector too short, using fallback"
        );
        return (fallback_attribution(), AttributionSource::Fallback);
    }

    let mut ranked: Vec<(usize, f64)> = feature_names
        .iter()
        .enumerate()
        .map(|(idx, _)| (idx, attributions[idx]))
        .collect();
    ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    let survivors: Vec<TokenImpact> = ranked
        .into_iter()
        .take(config.attribution_top_k)
        .filter(|&(_, impact)| impact.abs() >= config.attribution_min_impact)
        .filter(|&(idx, _)| {
            let token = feature_names[idx].as_str();
            token.chars().count() >= config.attribution_min_token_chars
                && !is_purely_numeric(token)
        })
        .map(|(idx, impact)| TokenImpact::new(feature_names[idx].clone(), round4(impact)))
        .collect();

    if survivors.is_empty() {
        debug!("no attribution entries survived filtering, using fallback");
        (fallback_attribution(), AttributionSource::Fallback)
    } else {
        (survivors, AttributionSource::Model)
    }
}

fn is_purely_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubModel {
        attributions: Option<Vec<f64>>,
        n_classes: usize,
    }

    impl OriginModel for StubModel {
        fn n_features(&self) -> usize {
            self.attributions.as_ref().map_or(0, Vec::len)
        }

        fn n_classes(&self) -> usize {
            self.n_classes
        }

        fn predict_proba(&self, _features: &[f64]) -> Vec<f64> {
            vec![1.0 / self.n_classes as f64; self.n_classes]
        }

        fn class_attributions(&self, _features: &[f64], class_idx: usize) -> Option<Vec<f64>> {
            assert!(class_idx < self.n_classes, "class index must be clamped");
            self.attributions.clone()
        }

        fn describe(&self) -> String {
            "stub".to_string()
        }
    }

    fn names(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn ranks_by_absolute_impact_and_keeps_sign() {
        let model = StubModel {
            attributions: Some(vec![0.1, -0.4, 0.25]),
            n_classes: 3,
        };
        let feature_names = names(&["alpha", "bravo", "charlie"]);
        let (entries, source) = explain(
            &model,
            &[0.0; 3],
            0,
            &feature_names,
            &DetectorConfig::default(),
        );
        assert_eq!(source, AttributionSource::Model);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].token, "bravo");
        assert_eq!(entries[0].impact, -0.4);
        assert_eq!(entries[1].token, "charlie");
        assert_eq!(entries[2].token, "alpha");
    }

    #[test]
    fn drops_numeric_and_short_tokens() {
        let model = StubModel {
            attributions: Some(vec![0.5, 0.4, 0.3]),
            n_classes: 3,
        };
        let feature_names = names(&["12", "to", "analysis"]);
        let (entries, source) = explain(
            &model,
            &[0.0; 3],
            0,
            &feature_names,
            &DetectorConfig::default(),
        );
        assert_eq!(source, AttributionSource::Model);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].token, "analysis");
    }

    #[test]
    fn drops_near_zero_impacts() {
        let model = StubModel {
            attributions: Some(vec![1e-7, 0.2]),
            n_classes: 2,
        };
        let feature_names = names(&["whisper", "signal"]);
        let (entries, _) = explain(
            &model,
            &[0.0; 2],
            0,
            &feature_names,
            &DetectorConfig::default(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].token, "signal");
    }

    #[test]
    fn caps_at_top_k() {
        let attributions: Vec<f64> = (1..=12).map(|i| f64::from(i) * 0.01).collect();
        let tokens: Vec<String> = (1..=12).map(|i| format!("token{i:02}")).collect();
        let model = StubModel {
            attributions: Some(attributions),
            n_classes: 2,
        };
        let (entries, _) = explain(&model, &[0.0; 12], 0, &tokens, &DetectorConfig::default());
        assert_eq!(entries.len(), 10);
        // Largest first; the two smallest never made the cut.
        assert_eq!(entries[0].token, "token12");
        assert!(entries.iter().all(|e| e.token != "token01" && e.token != "token02"));
    }

    #[test]
    fn fallback_when_model_cannot_explain() {
        let model = StubModel {
            attributions: None,
            n_classes: 3,
        };
        let (entries, source) = explain(
            &model,
            &[0.0; 3],
            0,
            &names(&["alpha"]),
            &DetectorConfig::default(),
        );
        assert_eq!(source, AttributionSource::Fallback);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].token, "furthermore");
        assert_eq!(entries[0].impact, 0.21);
        assert_eq!(entries[4].token, "conclusion");
    }

    #[test]
    fn fallback_when_everything_is_filtered() {
        let model = StubModel {
            attributions: Some(vec![0.5]),
            n_classes: 2,
        };
        let (entries, source) = explain(
            &model,
            &[0.0; 1],
            0,
            &names(&["42"]),
            &DetectorConfig::default(),
        );
        assert_eq!(source, AttributionSource::Fallback);
        assert_eq!(entries.len(), 5);
    }

    #[test]
    fn fallback_when_attribution_vector_is_too_short() {
        let model = StubModel {
            attributions: Some(vec![0.5]),
            n_classes: 2,
        };
        let (_, source) = explain(
            &model,
            &[0.0; 1],
            0,
            &names(&["alpha", "bravo"]),
            &DetectorConfig::default(),
        );
        assert_eq!(source, AttributionSource::Fallback);
    }

    #[test]
    fn class_index_is_clamped_to_model_range() {
        let model = StubModel {
            attributions: Some(vec![0.5]),
            n_classes: 2,
        };
        // The stub asserts the received index is in range.
        let (entries, _) = explain(
            &model,
            &[0.0; 1],
            9,
            &names(&["alpha"]),
            &DetectorConfig::default(),
        );
        assert_eq!(entries[0].token, "alpha");
    }

    #[test]
    fn impacts_are_rounded() {
        let model = StubModel {
            attributions: Some(vec![0.123456]),
            n_classes: 2,
        };
        let (entries, _) = explain(
            &model,
            &[0.0; 1],
            0,
            &names(&["alpha"]),
            &DetectorConfig::default(),
        );
        assert_eq!(entries[0].impact, 0.1235);
    }
}
