//! Placement-readiness prediction: applicant feature validation, the
//! classifier capability seam, artifact loading, and the request pipeline
//! that ties them together.

pub mod classifier;
pub mod decision;
pub mod explanation;
pub mod features;
pub mod loader;
pub mod pipeline;

#[cfg(test)]
mod tests;

pub use classifier::{
    ClassProbabilities, Classifier, ClassifierError, PlacementClass, ProbabilisticClassifier,
};
pub use decision::{decide, Probability, POSITIVE_THRESHOLD_PERCENT};
pub use features::{
    ApplicantFeatures, FeatureField, FeatureVector, RawSubmission, ValidationError, FEATURE_COUNT,
};
pub use loader::{
    ArtifactDocument, Capabilities, Capability, LoadedModel, ModelDescriptor, ModelInvalid,
    ModelKind, ModelLoader, ARTIFACT_FORMAT_VERSION,
};
pub use pipeline::{
    PipelineError, PlacementAssessment, PlacementPipeline, SystemError, SYSTEM_ERROR_MESSAGE,
};
