use super::{
    check_vector, ClassProbabilities, Classifier, ClassifierError, ParameterError,
    PlacementClass, ProbabilisticClassifier,
};
use crate::placement::features::FeatureVector;
use serde::{Deserialize, Serialize};

/// Per-feature standardisation applied before the linear term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn validate(&self) -> Result<(), ParameterError> {
        check_vector("scaler.mean", &self.mean)?;
        check_vector("scaler.scale", &self.scale)?;
        if let Some(position) = self.scale.iter().position(|scale| *scale == 0.0) {
            return Err(ParameterError::ZeroScale(position));
        }
        Ok(())
    }

    fn transform(&self, position: usize, value: f64) -> f64 {
        (value - self.mean[position]) / self.scale[position]
    }
}

/// Binary logistic regression over the five applicant features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default)]
    scaler: Option<StandardScaler>,
}

impl LogisticRegression {
    pub fn new(
        coefficients: Vec<f64>,
        intercept: f64,
        scaler: Option<StandardScaler>,
    ) -> Result<Self, ParameterError> {
        let model = Self {
            coefficients,
            intercept,
            scaler,
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
        if let Some(scaler) = &self.scaler {
            scaler.validate()?;
        }
        Ok(())
    }

    fn decision_function(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        let values = features.as_slice();
        if values.len() != self.coefficients.len() {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.coefficients.len(),
                found: values.len(),
            });
        }

        let linear = values
            .iter()
            .zip(&self.coefficients)
            .enumerate()
            .map(|(position, (value, weight))| {
                let value = match &self.scaler {
                    Some(scaler) => scaler.transform(position, *value),
                    None => *value,
                };
                value * weight
            })
            .sum::<f64>()
            + self.intercept;

        if linear.is_nan() {
            return Err(ClassifierError::NonFiniteScore);
        }
        Ok(linear)
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &FeatureVector) -> Result<PlacementClass, ClassifierError> {
        Ok(self.predict_proba(features)?.most_likely())
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn predict_proba(
        &self,
        features: &FeatureVector,
    ) -> Result<ClassProbabilities, ClassifierError> {
        let score = self.decision_function(features)?;
        Ok(ClassProbabilities::from_positive(sigmoid(score)))
    }
}

fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::placement::features::FEATURE_COUNT;

    fn vector(values: [f64; FEATURE_COUNT]) -> FeatureVector {
        FeatureVector::from_raw(values)
    }

    #[test]
    fn zero_weights_give_even_odds() {
        let model = LogisticRegression::new(vec![0.0; 5], 0.0, None).expect("valid model");
        let proba = model
            .predict_proba(&vector([100.0, 5.0, 50.0, 50.0, 5.0]))
            .expect("prediction");
        assert!((proba.positive() - 0.5).abs() < 1e-12);
        assert!((proba.negative() - 0.5).abs() < 1e-12);
        assert_eq!(
            model.predict(&vector([100.0, 5.0, 50.0, 50.0, 5.0])),
            Ok(PlacementClass::Negative)
        );
    }

    #[test]
    fn scaler_centres_features_before_weighting() {
        let scaler = StandardScaler {
            mean: vec![100.0, 0.0, 0.0, 0.0, 0.0],
            scale: vec![10.0, 1.0, 1.0, 1.0, 1.0],
        };
        let model = LogisticRegression::new(vec![1.0, 0.0, 0.0, 0.0, 0.0], 0.0, Some(scaler))
            .expect("valid model");

        let at_mean = model
            .predict_proba(&vector([100.0, 9.0, 9.0, 9.0, 9.0]))
            .expect("prediction");
        assert!((at_mean.positive() - 0.5).abs() < 1e-12);

        let one_sd_above = model
            .predict_proba(&vector([110.0, 0.0, 0.0, 0.0, 0.0]))
            .expect("prediction");
        assert!((one_sd_above.positive() - sigmoid(1.0)).abs() < 1e-12);
        assert_eq!(
            model.predict(&vector([110.0, 0.0, 0.0, 0.0, 0.0])),
            Ok(PlacementClass::Positive)
        );
    }

    #[test]
    fn rejects_wrong_coefficient_count() {
        let err = LogisticRegression::new(vec![1.0; 4], 0.0, None).expect_err("too short");
        assert_eq!(
            err,
            ParameterError::WrongLength {
                parameter: "coefficients",
                expected: 5,
                found: 4
            }
        );
    }

    #[test]
    fn rejects_zero_scale() {
        let scaler = StandardScaler {
            mean: vec![0.0; 5],
            scale: vec![1.0, 1.0, 0.0, 1.0, 1.0],
        };
        let err = LogisticRegression::new(vec![1.0; 5], 0.0, Some(scaler)).expect_err("zero");
        assert_eq!(err, ParameterError::ZeroScale(2));
    }

    #[test]
    fn rejects_non_finite_intercept() {
        let err = LogisticRegression::new(vec![1.0; 5], f64::NAN, None).expect_err("nan");
        assert_eq!(
            err,
            ParameterError::NonFinite {
                parameter: "intercept"
            }
        );
    }
}
