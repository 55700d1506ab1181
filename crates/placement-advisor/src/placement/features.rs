use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;

/// Number of positions in the classifier input.
pub const FEATURE_COUNT: usize = 5;

/// Raw form submission keyed by field name, exactly as received.
pub type RawSubmission = HashMap<String, String>;

/// Applicant attributes in the positional order the classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureField {
    Iq,
    Cgpa,
    TenthMarks,
    TwelfthMarks,
    Communication,
}

impl FeatureField {
    /// Fixed field order. Also the validation order.
    pub const ALL: [FeatureField; FEATURE_COUNT] = [
        FeatureField::Iq,
        FeatureField::Cgpa,
        FeatureField::TenthMarks,
        FeatureField::TwelfthMarks,
        FeatureField::Communication,
    ];

    pub fn position(self) -> usize {
        match self {
            FeatureField::Iq => 0,
            FeatureField::Cgpa => 1,
            FeatureField::TenthMarks => 2,
            FeatureField::TwelfthMarks => 3,
            FeatureField::Communication => 4,
        }
    }

    /// Name of the form input carrying this field.
    pub fn form_key(self) -> &'static str {
        match self {
            FeatureField::Iq => "IQ",
            FeatureField::Cgpa => "CGPA",
            FeatureField::TenthMarks => "10th_Marks",
            FeatureField::TwelfthMarks => "12th_Marks",
            FeatureField::Communication => "Communication_Skills",
        }
    }

    /// Column name used when the classifier was trained.
    pub fn label(self) -> &'static str {
        match self {
            FeatureField::Iq => "IQ",
            FeatureField::Cgpa => "CGPA",
            FeatureField::TenthMarks => "10th Marks",
            FeatureField::TwelfthMarks => "12th Marks",
            FeatureField::Communication => "Communication Skills",
        }
    }

    pub fn bounds(self) -> RangeInclusive<f64> {
        match self {
            FeatureField::Iq => 70.0..=160.0,
            FeatureField::Cgpa => 0.0..=10.0,
            FeatureField::TenthMarks | FeatureField::TwelfthMarks => 0.0..=100.0,
            FeatureField::Communication => 0.0..=10.0,
        }
    }

    pub fn bound_message(self) -> &'static str {
        match self {
            FeatureField::Iq => "IQ must be between 70-160",
            FeatureField::Cgpa => "CGPA must be 0.0-10.0",
            FeatureField::TenthMarks => "10th Marks must be 0-100%",
            FeatureField::TwelfthMarks => "12th Marks must be 0-100%",
            FeatureField::Communication => "Communication must be 0-10",
        }
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Request-level rejection, safe to show to the requester verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a number (got '{raw}')")]
    NotNumeric { field: FeatureField, raw: String },
    #[error("{}", .field.bound_message())]
    OutOfRange { field: FeatureField, value: f64 },
}

impl ValidationError {
    pub fn field(&self) -> FeatureField {
        match self {
            ValidationError::NotNumeric { field, .. }
            | ValidationError::OutOfRange { field, .. } => *field,
        }
    }
}

/// Validated applicant attributes; every value sits inside its field bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApplicantFeatures {
    iq: f64,
    cgpa: f64,
    tenth_marks: f64,
    twelfth_marks: f64,
    communication: f64,
}

impl ApplicantFeatures {
    /// Coerce all five fields, then check bounds in field order.
    ///
    /// Missing fields count as `0`, which is then subject to the same bound
    /// check as any submitted value.
    pub fn from_submission(raw: &RawSubmission) -> Result<Self, ValidationError> {
        let mut values = [0.0; FEATURE_COUNT];
        for field in FeatureField::ALL {
            values[field.position()] = coerce(field, raw.get(field.form_key()))?;
        }
        Self::from_values(values)
    }

    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Result<Self, ValidationError> {
        for field in FeatureField::ALL {
            let value = values[field.position()];
            if !field.bounds().contains(&value) {
                return Err(ValidationError::OutOfRange { field, value });
            }
        }

        Ok(Self {
            iq: values[FeatureField::Iq.position()],
            cgpa: values[FeatureField::Cgpa.position()],
            tenth_marks: values[FeatureField::TenthMarks.position()],
            twelfth_marks: values[FeatureField::TwelfthMarks.position()],
            communication: values[FeatureField::Communication.position()],
        })
    }

    pub fn iq(&self) -> f64 {
        self.iq
    }

    pub fn cgpa(&self) -> f64 {
        self.cgpa
    }

    pub fn communication(&self) -> f64 {
        self.communication
    }

    pub fn get(&self, field: FeatureField) -> f64 {
        match field {
            FeatureField::Iq => self.iq,
            FeatureField::Cgpa => self.cgpa,
            FeatureField::TenthMarks => self.tenth_marks,
            FeatureField::TwelfthMarks => self.twelfth_marks,
            FeatureField::Communication => self.communication,
        }
    }

    pub fn to_vector(&self) -> FeatureVector {
        FeatureVector([
            self.iq,
            self.cgpa,
            self.tenth_marks,
            self.twelfth_marks,
            self.communication,
        ])
    }

    /// `(field, value)` pairs in field order, for summaries.
    pub fn entries(&self) -> Vec<(FeatureField, f64)> {
        FeatureField::ALL
            .iter()
            .map(|field| (*field, self.get(*field)))
            .collect()
    }
}

/// Positional 1x5 classifier input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Build a vector without bound checks. Used to probe models at the edges
    /// of the domain; request handling goes through [`ApplicantFeatures`].
    pub fn from_raw(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: FeatureField) -> f64 {
        self.0[field.position()]
    }
}

/// Plain decimal or exponent notation; digit separators such as `1_000` are
/// not numbers.
fn coerce(field: FeatureField, raw: Option<&String>) -> Result<f64, ValidationError> {
    let Some(raw) = raw else {
        return Ok(0.0);
    };

    raw.trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::NotNumeric {
            field,
            raw: raw.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(pairs: &[(&str, &str)]) -> RawSubmission {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn valid_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("IQ", "110"),
            ("CGPA", "7.5"),
            ("10th_Marks", "80"),
            ("12th_Marks", "82"),
            ("Communication_Skills", "6"),
        ]
    }

    fn with_override(key: &str, value: &str) -> RawSubmission {
        let mut raw = submission(&valid_pairs());
        raw.insert(key.to_string(), value.to_string());
        raw
    }

    #[test]
    fn every_bound_is_inclusive() {
        for field in FeatureField::ALL {
            let bounds = field.bounds();
            for edge in [*bounds.start(), *bounds.end()] {
                let raw = with_override(field.form_key(), &edge.to_string());
                let features = ApplicantFeatures::from_submission(&raw)
                    .unwrap_or_else(|err| panic!("{field} = {edge} should pass: {err}"));
                assert_eq!(features.get(field), edge);
            }
        }
    }

    #[test]
    fn one_unit_beyond_each_bound_is_rejected() {
        for field in FeatureField::ALL {
            let bounds = field.bounds();
            for beyond in [*bounds.start() - 1.0, *bounds.end() + 1.0] {
                let raw = with_override(field.form_key(), &beyond.to_string());
                let err = ApplicantFeatures::from_submission(&raw).expect_err("out of range");
                assert_eq!(err, ValidationError::OutOfRange { field, value: beyond });
                assert_eq!(err.to_string(), field.bound_message());
            }
        }
    }

    #[test]
    fn first_invalid_field_in_order_is_reported() {
        let mut raw = with_override("IQ", "200");
        raw.insert("CGPA".to_string(), "11".to_string());

        let err = ApplicantFeatures::from_submission(&raw).expect_err("iq invalid");
        assert_eq!(err.field(), FeatureField::Iq);
        assert_eq!(err.to_string(), "IQ must be between 70-160");
    }

    #[test]
    fn missing_cgpa_defaults_to_zero() {
        let mut raw = submission(&valid_pairs());
        raw.remove("CGPA");

        let features = ApplicantFeatures::from_submission(&raw).expect("zero cgpa is in range");
        assert_eq!(features.cgpa(), 0.0);
    }

    #[test]
    fn missing_iq_defaults_to_zero_and_fails_its_bound() {
        let mut raw = submission(&valid_pairs());
        raw.remove("IQ");

        let err = ApplicantFeatures::from_submission(&raw).expect_err("zero iq below 70");
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: FeatureField::Iq,
                value: 0.0
            }
        );
    }

    #[test]
    fn non_numeric_value_is_distinct_from_range_error() {
        let raw = with_override("12th_Marks", "ninety");
        let err = ApplicantFeatures::from_submission(&raw).expect_err("not a number");
        assert_eq!(
            err,
            ValidationError::NotNumeric {
                field: FeatureField::TwelfthMarks,
                raw: "ninety".to_string()
            }
        );
        assert_eq!(err.to_string(), "12th Marks must be a number (got 'ninety')");
    }

    #[test]
    fn digit_separators_are_not_numbers() {
        let raw = with_override("10th_Marks", "8_5");
        let err = ApplicantFeatures::from_submission(&raw).expect_err("underscore rejected");
        assert_eq!(
            err,
            ValidationError::NotNumeric {
                field: FeatureField::TenthMarks,
                raw: "8_5".to_string()
            }
        );
    }

    #[test]
    fn coercion_runs_before_bound_checks() {
        let mut raw = with_override("IQ", "500");
        raw.insert("Communication_Skills".to_string(), "".to_string());

        let err = ApplicantFeatures::from_submission(&raw).expect_err("empty value");
        assert!(matches!(
            err,
            ValidationError::NotNumeric {
                field: FeatureField::Communication,
                ..
            }
        ));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let raw = with_override("CGPA", "  8.25 ");
        let features = ApplicantFeatures::from_submission(&raw).expect("trimmed value parses");
        assert_eq!(features.cgpa(), 8.25);
    }

    #[test]
    fn nan_never_satisfies_a_bound() {
        let raw = with_override("10th_Marks", "NaN");
        let err = ApplicantFeatures::from_submission(&raw).expect_err("nan rejected");
        assert_eq!(err.field(), FeatureField::TenthMarks);
    }

    #[test]
    fn vector_follows_fixed_field_order() {
        let features = ApplicantFeatures::from_submission(&submission(&valid_pairs()))
            .expect("valid submission");
        let vector = features.to_vector();

        assert_eq!(vector.len(), FEATURE_COUNT);
        assert_eq!(vector.as_slice(), &[110.0, 7.5, 80.0, 82.0, 6.0]);
        for field in FeatureField::ALL {
            assert_eq!(vector.get(field), features.get(field));
        }
    }

    #[test]
    fn unrelated_form_keys_are_ignored() {
        let mut raw = submission(&valid_pairs());
        raw.insert("Communication Skills".to_string(), "abc".to_string());
        raw.insert("csrf".to_string(), "token".to_string());

        assert!(ApplicantFeatures::from_submission(&raw).is_ok());
    }
}
