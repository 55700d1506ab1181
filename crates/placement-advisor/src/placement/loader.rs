use super::classifier::{
    Classifier, DecisionTree, LinearSvm, LogisticRegression, ParameterError,
    ProbabilisticClassifier,
};
use super::features::FeatureField;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Artifact layout revision this build understands.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Startup failure: the classifier artifact is unusable. Never recoverable.
#[derive(Debug, thiserror::Error)]
pub enum ModelInvalid {
    #[error("failed to read model artifact {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("unsupported artifact format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("artifact feature order {found:?} does not match {expected:?}")]
    FeatureOrder {
        found: Vec<String>,
        expected: Vec<String>,
    },
    #[error("invalid model parameters: {0}")]
    Parameters(#[from] ParameterError),
    #[error("{kind} model lacks the {missing} capability")]
    MissingCapability { kind: ModelKind, missing: Capability },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ClassPrediction,
    ProbabilityPrediction,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ClassPrediction => f.write_str("class-prediction"),
            Capability::ProbabilityPrediction => f.write_str("probability-prediction"),
        }
    }
}

/// What a model family can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub class_prediction: bool,
    pub probability_prediction: bool,
}

impl Capabilities {
    /// First required capability that is absent, in check order.
    pub fn missing(&self) -> Option<Capability> {
        if !self.class_prediction {
            Some(Capability::ClassPrediction)
        } else if !self.probability_prediction {
            Some(Capability::ProbabilityPrediction)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    DecisionTree,
    LinearSvm,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::LogisticRegression => f.write_str("logistic_regression"),
            ModelKind::DecisionTree => f.write_str("decision_tree"),
            ModelKind::LinearSvm => f.write_str("linear_svm"),
        }
    }
}

/// Model parameters, tagged by family.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    LinearSvm(LinearSvm),
}

impl ModelArtifact {
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelArtifact::LogisticRegression(_) => ModelKind::LogisticRegression,
            ModelArtifact::DecisionTree(_) => ModelKind::DecisionTree,
            ModelArtifact::LinearSvm(_) => ModelKind::LinearSvm,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            ModelArtifact::LogisticRegression(_) | ModelArtifact::DecisionTree(_) => Capabilities {
                class_prediction: true,
                probability_prediction: true,
            },
            ModelArtifact::LinearSvm(_) => Capabilities {
                class_prediction: true,
                probability_prediction: false,
            },
        }
    }

    fn validate(&self) -> Result<(), ParameterError> {
        match self {
            ModelArtifact::LogisticRegression(model) => model.validate(),
            ModelArtifact::DecisionTree(model) => model.validate(),
            ModelArtifact::LinearSvm(model) => model.validate(),
        }
    }

    /// Class-prediction view, available for every family.
    pub fn classifier(&self) -> Arc<dyn Classifier> {
        match self {
            ModelArtifact::LogisticRegression(model) => Arc::new(model.clone()),
            ModelArtifact::DecisionTree(model) => Arc::new(model.clone()),
            ModelArtifact::LinearSvm(model) => Arc::new(model.clone()),
        }
    }

    /// Probability-prediction view, if the family supports it.
    pub fn probabilistic(&self) -> Option<Arc<dyn ProbabilisticClassifier>> {
        match self {
            ModelArtifact::LogisticRegression(model) => Some(Arc::new(model.clone())),
            ModelArtifact::DecisionTree(model) => Some(Arc::new(model.clone())),
            ModelArtifact::LinearSvm(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ArtifactEnvelope {
    format_version: u32,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    model: ModelArtifact,
}

/// Summary of a decoded artifact, for logs and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDescriptor {
    pub kind: ModelKind,
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub capabilities: Capabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

/// Decoded and structurally checked artifact whose capabilities have not
/// been enforced yet.
#[derive(Debug, Clone)]
pub struct ArtifactDocument {
    pub descriptor: ModelDescriptor,
    pub model: ModelArtifact,
}

impl ArtifactDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelInvalid> {
        let envelope: ArtifactEnvelope =
            serde_json::from_slice(bytes).map_err(ModelInvalid::Decode)?;

        if envelope.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelInvalid::UnsupportedVersion {
                found: envelope.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }

        let expected = expected_feature_names();
        let feature_names = match envelope.feature_names {
            Some(found) if found != expected => {
                return Err(ModelInvalid::FeatureOrder { found, expected });
            }
            Some(found) => found,
            None => expected,
        };

        envelope.model.validate()?;

        Ok(Self {
            descriptor: ModelDescriptor {
                kind: envelope.model.kind(),
                format_version: envelope.format_version,
                feature_names,
                capabilities: envelope.model.capabilities(),
                source: None,
            },
            model: envelope.model,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelInvalid> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ModelInvalid::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut document = Self::from_slice(&bytes)?;
        document.descriptor.source = Some(path.to_path_buf());
        Ok(document)
    }

    /// Enforce the capability pair and hand out the shared classifier.
    pub fn into_loaded(self) -> Result<LoadedModel, ModelInvalid> {
        let kind = self.descriptor.kind;
        if let Some(missing) = self.descriptor.capabilities.missing() {
            return Err(ModelInvalid::MissingCapability { kind, missing });
        }

        let classifier = self
            .model
            .probabilistic()
            .ok_or(ModelInvalid::MissingCapability {
                kind,
                missing: Capability::ProbabilityPrediction,
            })?;

        Ok(LoadedModel {
            descriptor: self.descriptor,
            classifier,
        })
    }
}

/// Classifier held read-only for the lifetime of the process.
#[derive(Clone)]
pub struct LoadedModel {
    pub descriptor: ModelDescriptor,
    pub classifier: Arc<dyn ProbabilisticClassifier>,
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Reads classifier artifacts from disk once at startup.
pub struct ModelLoader;

impl ModelLoader {
    pub fn load(path: impl AsRef<Path>) -> Result<LoadedModel, ModelInvalid> {
        let loaded = ArtifactDocument::from_path(path)?.into_loaded()?;
        info!(
            kind = %loaded.descriptor.kind,
            path = ?loaded.descriptor.source,
            "classifier artifact loaded"
        );
        Ok(loaded)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<LoadedModel, ModelInvalid> {
        ArtifactDocument::from_slice(bytes)?.into_loaded()
    }
}

fn expected_feature_names() -> Vec<String> {
    FeatureField::ALL
        .iter()
        .map(|field| field.label().to_string())
        .collect()
}
