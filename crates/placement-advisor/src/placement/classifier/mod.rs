//! Capability traits for the external classifier and the model families that
//! implement them.
//!
//! The pipeline only ever sees `dyn ProbabilisticClassifier`; it never learns
//! which family produced a probability.

mod linear_svm;
mod logistic;
mod tree;

pub use linear_svm::LinearSvm;
pub use logistic::{LogisticRegression, StandardScaler};
pub use tree::{DecisionTree, TreeNode};

use super::features::{FeatureVector, FEATURE_COUNT};
use serde::{Deserialize, Serialize};

/// Binary label produced by a classifier or by thresholding its probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementClass {
    Negative,
    Positive,
}

impl PlacementClass {
    /// Numeric class index as used by the training data.
    pub fn code(self) -> u8 {
        match self {
            PlacementClass::Negative => 0,
            PlacementClass::Positive => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlacementClass::Negative => "Needs Improvement",
            PlacementClass::Positive => "High Placement Potential",
        }
    }
}

/// Per-class probability distribution, `[P(negative), P(positive)]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbabilities([f64; 2]);

impl ClassProbabilities {
    pub fn new(negative: f64, positive: f64) -> Self {
        Self([negative, positive])
    }

    /// Distribution for a positive-class probability `p`.
    pub fn from_positive(positive: f64) -> Self {
        Self([1.0 - positive, positive])
    }

    pub fn negative(&self) -> f64 {
        self.0[0]
    }

    pub fn positive(&self) -> f64 {
        self.0[1]
    }

    /// Class holding the larger share; ties go to the negative class.
    pub fn most_likely(&self) -> PlacementClass {
        if self.positive() > self.negative() {
            PlacementClass::Positive
        } else {
            PlacementClass::Negative
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("expected {expected} features, received {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("classifier produced a non-finite score")]
    NonFiniteScore,
    #[error("decision tree walked into missing node {0}")]
    MissingNode(usize),
}

/// Structural defect found while checking a model's parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("{parameter} has {found} entries, expected {expected}")]
    WrongLength {
        parameter: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{parameter} contains a non-finite value")]
    NonFinite { parameter: &'static str },
    #[error("scaler scale at position {0} must be non-zero")]
    ZeroScale(usize),
    #[error("decision tree has no nodes")]
    EmptyTree,
    #[error("node {node} splits on feature {feature}, which does not exist")]
    FeatureOutOfRange { node: usize, feature: usize },
    #[error("node {node} points at child {child}, which must come after it and exist")]
    InvalidChild { node: usize, child: usize },
    #[error("leaf {0} must carry non-negative class weights with a positive sum")]
    InvalidLeaf(usize),
}

/// Class-prediction capability.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<PlacementClass, ClassifierError>;
}

/// Probability-prediction capability.
pub trait ProbabilisticClassifier: Classifier {
    fn predict_proba(&self, features: &FeatureVector)
        -> Result<ClassProbabilities, ClassifierError>;
}

fn check_vector(parameter: &'static str, values: &[f64]) -> Result<(), ParameterError> {
    if values.len() != FEATURE_COUNT {
        return Err(ParameterError::WrongLength {
            parameter,
            expected: FEATURE_COUNT,
            found: values.len(),
        });
    }
    if values.iter().any(|value| !value.is_finite()) {
        return Err(ParameterError::NonFinite { parameter });
    }
    Ok(())
}
