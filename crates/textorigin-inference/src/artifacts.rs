//! The artifact bundle: everything fitted offline, loaded once at startup.
//!
//! Three bincode files live in one directory. Loading is fail-fast: any
//! missing, unreadable or mutually inconsistent artifact is an error and
//! the caller refuses to serve. There is no per-call error sentinel; a
//! bundle that loaded is valid for the process lifetime.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use textorigin_features::{STYLOMETRIC_DIM, TfidfVectorizer};

use crate::model::{ForestClassifier, LabelEncoder, OriginModel};
use crate::result::{OriginLabel, UnknownLabel};

pub const VECTORIZER_FILENAME: &str = "tfidf-vectorizer.bin";
pub const CLASSIFIER_FILENAME: &str = "origin-forest.bin";
pub const LABEL_ENCODER_FILENAME: &str = "label-encoder.bin";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact {name} not found in {dir}")]
    Missing { name: &'static str, dir: PathBuf },
    #[error("failed to read artifact {name}")]
    Unreadable {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact {name} is corrupt")]
    Corrupt {
        name: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error(
        "model expects {model_features} features but vectorizer ({vocabulary}) \
         + stylometry ({stylometric}) provide {provided}"
    )]
    DimensionMismatch {
        model_features: usize,
        vocabulary: usize,
        stylometric: usize,
        provided: usize,
    },
    #[error("model emits {model_classes} classes but the label encoder lists {encoder_classes}")]
    ClassCountMismatch {
        model_classes: usize,
        encoder_classes: usize,
    },
    #[error(transparent)]
    UnknownClass(#[from] UnknownLabel),
}

/// Fitted vectorizer, classifier and class table, cross-validated against
/// each other. Read-only once built.
pub struct ArtifactBundle {
    vectorizer: TfidfVectorizer,
    model: Box<dyn OriginModel>,
    labels: Vec<OriginLabel>,
    class_names: Vec<String>,
    /// Vocabulary tokens by column, cached for the explanation engine.
    feature_names: Vec<String>,
}

impl fmt::Debug for ArtifactBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactBundle")
            .field("vocabulary_size", &self.vectorizer.num_features())
            .field("classes", &self.class_names)
            .field("model", &self.model.describe())
            .finish()
    }
}

impl ArtifactBundle {
    /// Load the three artifacts from `dir` and cross-validate them.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        info!(dir = %dir.display(), "loading artifact bundle");

        let vectorizer = TfidfVectorizer::from_bytes(&read_artifact(dir, VECTORIZER_FILENAME)?)
            .map_err(|source| ArtifactError::Corrupt {
                name: VECTORIZER_FILENAME,
                source: Box::new(source),
            })?;
        let model = ForestClassifier::from_bytes(&read_artifact(dir, CLASSIFIER_FILENAME)?)
            .map_err(|source| ArtifactError::Corrupt {
                name: CLASSIFIER_FILENAME,
                source: Box::new(source),
            })?;
        let encoder = LabelEncoder::from_bytes(&read_artifact(dir, LABEL_ENCODER_FILENAME)?)
            .map_err(|source| ArtifactError::Corrupt {
                name: LABEL_ENCODER_FILENAME,
                source: Box::new(source),
            })?;

        Self::from_parts(vectorizer, Box::new(model), encoder)
    }

    /// Assemble a bundle from already-loaded parts. This is the seam for
    /// swapping in a different [`OriginModel`] implementation.
    ///
    /// Validates the trained-model contract: feature width must equal
    /// vocabulary size plus the stylometric block, and the model's class
    /// count must match the encoder's, with every class name a known label.
    pub fn from_parts(
        vectorizer: TfidfVectorizer,
        model: Box<dyn OriginModel>,
        encoder: LabelEncoder,
    ) -> Result<Self, ArtifactError> {
        let provided = vectorizer.num_features() + STYLOMETRIC_DIM;
        if model.n_features() != provided {
            return Err(ArtifactError::DimensionMismatch {
                model_features: model.n_features(),
                vocabulary: vectorizer.num_features(),
                stylometric: STYLOMETRIC_DIM,
                provided,
            });
        }
        if model.n_classes() != encoder.n_classes() {
            return Err(ArtifactError::ClassCountMismatch {
                model_classes: model.n_classes(),
                encoder_classes: encoder.n_classes(),
            });
        }
        let labels = encoder
            .classes()
            .iter()
            .map(|name| name.parse::<OriginLabel>())
            .collect::<Result<Vec<_>, _>>()?;

        let class_names = encoder.classes().to_vec();
        let feature_names = vectorizer.feature_names();
        info!(
            vocabulary_size = vectorizer.num_features(),
            n_features = model.n_features(),
            classes = ?class_names,
            "artifact bundle ready"
        );

        Ok(Self {
            vectorizer,
            model,
            labels,
            class_names,
            feature_names,
        })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &dyn OriginModel {
        self.model.as_ref()
    }

    /// Class index -> label, in fitted order.
    pub fn labels(&self) -> &[OriginLabel] {
        &self.labels
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Vocabulary tokens by column index.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[must_use]
    pub fn info(&self) -> BundleInfo {
        BundleInfo {
            vocabulary_size: self.vectorizer.num_features(),
            n_features: self.model.n_features(),
            classes: self.class_names.clone(),
            model: self.model.describe(),
        }
    }
}

/// Diagnostic summary of a loaded bundle.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BundleInfo {
    pub vocabulary_size: usize,
    pub n_features: usize,
    pub classes: Vec<String>,
    pub model: String,
}

fn read_artifact(dir: &Path, name: &'static str) -> Result<Vec<u8>, ArtifactError> {
    let path = dir.join(name);
    fs::read(&path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ArtifactError::Missing {
            name,
            dir: dir.to_path_buf(),
        },
        _ => ArtifactError::Unreadable { name, source },
    })
}
