use crate::placement::{
    ClassProbabilities, Classifier, ClassifierError, FeatureVector, PlacementClass,
    PlacementPipeline, ProbabilisticClassifier, RawSubmission,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returns a fixed positive-class mass and records every vector it sees.
#[derive(Default)]
pub(super) struct ScriptedClassifier {
    positive: f64,
    calls: AtomicUsize,
    seen: Mutex<Vec<FeatureVector>>,
}

impl ScriptedClassifier {
    pub(super) fn returning(positive: f64) -> Arc<Self> {
        Arc::new(Self {
            positive,
            ..Self::default()
        })
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn seen(&self) -> Vec<FeatureVector> {
        self.seen.lock().expect("classifier mutex poisoned").clone()
    }
}

impl Classifier for ScriptedClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<PlacementClass, ClassifierError> {
        Ok(self.predict_proba(features)?.most_likely())
    }
}

impl ProbabilisticClassifier for ScriptedClassifier {
    fn predict_proba(
        &self,
        features: &FeatureVector,
    ) -> Result<ClassProbabilities, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("classifier mutex poisoned")
            .push(*features);
        Ok(ClassProbabilities::new(1.0 - self.positive, self.positive))
    }
}

/// Fails every call, standing in for a broken model.
pub(super) struct BrokenClassifier;

impl Classifier for BrokenClassifier {
    fn predict(&self, _features: &FeatureVector) -> Result<PlacementClass, ClassifierError> {
        Err(ClassifierError::NonFiniteScore)
    }
}

impl ProbabilisticClassifier for BrokenClassifier {
    fn predict_proba(
        &self,
        _features: &FeatureVector,
    ) -> Result<ClassProbabilities, ClassifierError> {
        Err(ClassifierError::NonFiniteScore)
    }
}

pub(super) fn pipeline_with(classifier: Arc<dyn ProbabilisticClassifier>) -> PlacementPipeline {
    PlacementPipeline::new(classifier)
}

pub(super) fn submission(pairs: &[(&str, &str)]) -> RawSubmission {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

pub(super) fn strong_candidate() -> RawSubmission {
    submission(&[
        ("IQ", "130"),
        ("CGPA", "8.5"),
        ("10th_Marks", "85"),
        ("12th_Marks", "90"),
        ("Communication_Skills", "8"),
    ])
}

pub(super) fn developing_candidate() -> RawSubmission {
    submission(&[
        ("IQ", "90"),
        ("CGPA", "5.0"),
        ("10th_Marks", "60"),
        ("12th_Marks", "65"),
        ("Communication_Skills", "4"),
    ])
}

pub(super) fn logistic_artifact() -> Value {
    json!({
        "format_version": 1,
        "feature_names": ["IQ", "CGPA", "10th Marks", "12th Marks", "Communication Skills"],
        "model": {
            "kind": "logistic_regression",
            "coefficients": [0.6, 1.4, 0.3, 0.4, 0.9],
            "intercept": 0.2,
            "scaler": {
                "mean": [110.0, 7.0, 75.0, 75.0, 6.0],
                "scale": [15.0, 1.5, 12.0, 12.0, 2.0]
            }
        }
    })
}

pub(super) fn bytes(document: &Value) -> Vec<u8> {
    serde_json::to_vec(document).expect("artifact serializes")
}
