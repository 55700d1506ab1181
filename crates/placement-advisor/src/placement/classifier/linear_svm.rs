use super::{check_vector, Classifier, ClassifierError, ParameterError, PlacementClass};
use crate::placement::features::FeatureVector;
use serde::{Deserialize, Serialize};

/// Margin classifier without calibrated probabilities. It can label an
/// applicant but cannot say how confident it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSvm {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearSvm {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, ParameterError> {
        let model = Self {
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        check_vector("coefficients", &self.coefficients)?;
        if !self.intercept.is_finite() {
            return Err(ParameterError::NonFinite {
                parameter: "intercept",
            });
        }
        Ok(())
    }
}

impl Classifier for LinearSvm {
    fn predict(&self, features: &FeatureVector) -> Result<PlacementClass, ClassifierError> {
        let values = features.as_slice();
        if values.len() != self.coefficients.len() {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.coefficients.len(),
                found: values.len(),
            });
        }

        let margin = values
            .iter()
            .zip(&self.coefficients)
            .map(|(value, weight)| value * weight)
            .sum::<f64>()
            + self.intercept;

        if margin.is_nan() {
            return Err(ClassifierError::NonFiniteScore);
        }

        Ok(if margin > 0.0 {
            PlacementClass::Positive
        } else {
            PlacementClass::Negative
        })
    }
}
