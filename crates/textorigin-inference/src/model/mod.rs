//! The classifier capability and its shipped implementation.

mod encoder;
mod forest;

pub use encoder::{EncoderError, LabelEncoder};
pub use forest::{DecisionTree, ForestClassifier, ForestError, TreeNode};

/// What the pipeline needs from a classifier, and nothing more. Any
/// deterministic model over the assembled feature layout qualifies; the
/// shipped implementation is [`ForestClassifier`].
pub trait OriginModel: Send + Sync {
    /// Expected width of the dense feature row.
    fn n_features(&self) -> usize;

    /// Number of classes in the output distribution, matching the fitted
    /// label encoder.
    fn n_classes(&self) -> usize;

    /// Class probability distribution for one feature row. Must be
    /// deterministic for a fixed row.
    fn predict_proba(&self, features: &[f64]) -> Vec<f64>;

    /// Signed per-feature attributions for `class_idx` (which must be
    /// below `n_classes`), or `None` for models that cannot explain
    /// themselves. Callers fall back to a canned explanation in that case.
    fn class_attributions(&self, features: &[f64], class_idx: usize) -> Option<Vec<f64>> {
        let _ = (features, class_idx);
        None
    }

    /// One-line human description for diagnostics.
    fn describe(&self) -> String;
}

impl OriginModel for ForestClassifier {
    fn n_features(&self) -> usize {
        self.n_features()
    }

    fn n_classes(&self) -> usize {
        self.n_classes()
    }

    fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        ForestClassifier::predict_proba(self, features)
    }

    fn class_attributions(&self, features: &[f64], class_idx: usize) -> Option<Vec<f64>> {
        Some(ForestClassifier::class_attributions(self, features, class_idx))
    }

    fn describe(&self) -> String {
        format!(
            "decision forest: {} trees, {} features, {} classes",
            self.tree_count(),
            ForestClassifier::n_features(self),
            ForestClassifier::n_classes(self)
        )
    }
}
