use super::classifier::{ClassifierError, PlacementClass, ProbabilisticClassifier};
use super::decision::{decide, Probability};
use super::explanation::explain;
use super::features::{
    ApplicantFeatures, FeatureVector, RawSubmission, ValidationError, FEATURE_COUNT,
};
use super::loader::LoadedModel;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Message shown to requesters for anything that is not their fault.
pub const SYSTEM_ERROR_MESSAGE: &str = "System error. Please try again.";

/// Outcome of one successful prediction, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementAssessment {
    pub features: ApplicantFeatures,
    pub probability: Probability,
    pub outcome: PlacementClass,
    pub explanation: String,
}

/// Unexpected failure inside the pipeline. Logged, never shown.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SystemError {
    #[error("classifier invocation failed: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("feature vector has {found} positions, expected {expected}")]
    FeatureDimension { expected: usize, found: usize },
    #[error("classifier returned an invalid positive-class probability {0}")]
    InvalidProbability(f64),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    System(#[from] SystemError),
}

impl PipelineError {
    /// Text safe to return to the requester.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Validation(err) => format!("Validation Error: {err}"),
            PipelineError::System(_) => SYSTEM_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }
}

/// Stateless request pipeline over a shared, read-only classifier.
#[derive(Clone)]
pub struct PlacementPipeline {
    classifier: Arc<dyn ProbabilisticClassifier>,
}

impl PlacementPipeline {
    pub fn new(classifier: Arc<dyn ProbabilisticClassifier>) -> Self {
        Self { classifier }
    }

    pub fn from_model(model: &LoadedModel) -> Self {
        Self::new(model.classifier.clone())
    }

    /// Validate one submission, score it, and explain the verdict.
    ///
    /// Validation failures return before the classifier is touched. Any other
    /// failure is logged here and surfaces as [`PipelineError::System`].
    pub fn evaluate(&self, raw: &RawSubmission) -> Result<PlacementAssessment, PipelineError> {
        let features = ApplicantFeatures::from_submission(raw).map_err(|err| {
            debug!(field = %err.field(), error = %err, "submission rejected");
            err
        })?;

        self.assess(features).map_err(|err| {
            error!(error = %err, "placement prediction failed");
            PipelineError::System(err)
        })
    }

    fn assess(&self, features: ApplicantFeatures) -> Result<PlacementAssessment, SystemError> {
        let vector = features.to_vector();
        ensure_dimension(&vector)?;

        let distribution = self.classifier.predict_proba(&vector)?;
        let probability = Probability::from_fraction(distribution.positive())
            .ok_or(SystemError::InvalidProbability(distribution.positive()))?;

        let outcome = decide(probability);
        let explanation = explain(&features, probability, outcome);

        Ok(PlacementAssessment {
            features,
            probability,
            outcome,
            explanation,
        })
    }
}

fn ensure_dimension(vector: &FeatureVector) -> Result<(), SystemError> {
    if vector.len() != FEATURE_COUNT {
        return Err(SystemError::FeatureDimension {
            expected: FEATURE_COUNT,
            found: vector.len(),
        });
    }
    Ok(())
}
