use super::classifier::PlacementClass;
use serde::Serialize;
use std::fmt;

/// Minimum confidence, in percent, for a placement-ready verdict.
pub const POSITIVE_THRESHOLD_PERCENT: f64 = 60.0;

/// Positive-class probability scaled to `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Probability(f64);

impl Probability {
    /// Scale a probability mass in `[0, 1]`. Anything else is not a probability.
    pub fn from_fraction(mass: f64) -> Option<Self> {
        if mass.is_finite() && (0.0..=1.0).contains(&mass) {
            Some(Self(mass * 100.0))
        } else {
            None
        }
    }

    pub fn percent(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

pub fn decide(probability: Probability) -> PlacementClass {
    if probability.percent() >= POSITIVE_THRESHOLD_PERCENT {
        PlacementClass::Positive
    } else {
        PlacementClass::Negative
    }
}
