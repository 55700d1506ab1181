use chrono::{DateTime, Utc};
use placement_advisor::placement::{
    FeatureField, PlacementAssessment, PlacementClass, Probability, RawSubmission,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// One validated input echoed back to the requester.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct InputSummaryEntry {
    pub(crate) field: FeatureField,
    pub(crate) label: &'static str,
    pub(crate) value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PredictionView {
    pub(crate) outcome: PlacementClass,
    pub(crate) prediction: u8,
    pub(crate) probability: Probability,
    pub(crate) explanation: String,
    pub(crate) input_summary: Vec<InputSummaryEntry>,
    pub(crate) evaluated_at: DateTime<Utc>,
}

impl PredictionView {
    pub(crate) fn from_assessment(assessment: PlacementAssessment) -> Self {
        let input_summary = assessment
            .features
            .entries()
            .into_iter()
            .map(|(field, value)| InputSummaryEntry {
                field,
                label: field.label(),
                value,
            })
            .collect();

        Self {
            outcome: assessment.outcome,
            prediction: assessment.outcome.code(),
            probability: assessment.probability,
            explanation: assessment.explanation,
            input_summary,
            evaluated_at: Utc::now(),
        }
    }
}

/// Flatten a JSON body into the same shape as a form post. Numbers and
/// strings pass through as text, `null` counts as missing, and anything else
/// is kept verbatim so coercion rejects it.
pub(crate) fn submission_from_json(payload: HashMap<String, Value>) -> RawSubmission {
    payload
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(text) => Some((key, text)),
            Value::Number(number) => Some((key, number.to_string())),
            other => Some((key, other.to_string())),
        })
        .collect()
}
