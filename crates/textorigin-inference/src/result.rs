use std::fmt;
use std::str::FromStr;

use textorigin_features::StylometricProfile;

/// Predicted origin of a text.
///
/// `Human`, `Ai` and `LlmRewritten` are trained classes; `Uncertain` is
/// assigned by the decision policy when the probability distribution is
/// too flat to trust, and never appears in a fitted label encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OriginLabel {
    Human,
    #[serde(rename = "AI")]
    Ai,
    #[serde(rename = "LLM-Rewritten")]
    LlmRewritten,
    Uncertain,
}

impl OriginLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Human => "Human",
            Self::Ai => "AI",
            Self::LlmRewritten => "LLM-Rewritten",
            Self::Uncertain => "Uncertain",
        }
    }
}

impl fmt::Display for OriginLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown origin label {0:?}")]
pub struct UnknownLabel(pub String);

impl FromStr for OriginLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Human" => Ok(Self::Human),
            "AI" => Ok(Self::Ai),
            "LLM-Rewritten" => Ok(Self::LlmRewritten),
            "Uncertain" => Ok(Self::Uncertain),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// One signed attribution entry: how strongly a vocabulary token pushed
/// the prediction toward (positive) or away from (negative) the predicted
/// class.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TokenImpact {
    pub token: String,
    pub impact: f64,
}

impl TokenImpact {
    pub fn new(token: impl Into<String>, impact: f64) -> Self {
        Self {
            token: token.into(),
            impact,
        }
    }
}

/// Where the attribution list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionSource {
    /// Derived from the model's decision paths.
    Model,
    /// The model could not produce usable attributions; the fixed fallback
    /// set was substituted.
    Fallback,
    /// Deliberately withheld: empty input, the short-text rule, or a
    /// chunked aggregate that has no single attribution.
    Suppressed,
}

/// The outcome of classifying one text. Immutable once built; persistence
/// and transport are collaborator concerns.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PredictionResult {
    pub label: OriginLabel,
    /// Highest class probability, rounded to 4 decimals. Stays the argmax
    /// probability even when the policy overrides the label.
    pub confidence: f64,
    /// Ordered by descending absolute impact. Possibly empty.
    pub attribution: Vec<TokenImpact>,
    pub attribution_source: AttributionSource,
    /// Absent only for empty input, where nothing was extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylometry: Option<StylometricProfile>,
}

impl PredictionResult {
    /// The fixed result for empty or whitespace-only input. The classifier
    /// is never consulted.
    #[must_use]
    pub fn empty_input() -> Self {
        Self {
            label: OriginLabel::Human,
            confidence: 0.0,
            attribution: Vec::new(),
            attribution_source: AttributionSource::Suppressed,
            stylometry: None,
        }
    }
}
