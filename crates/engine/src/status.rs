//! Reconciliation status of a tally/dispatcher pair of totals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Weight;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Neither side recorded anything.
    NotStarted,
    Balanced,
    WithinThreshold,
    OutOfThreshold,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::Balanced => "balanced",
            Self::WithinThreshold => "within threshold",
            Self::OutOfThreshold => "out of threshold",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a difference against the acceptable-difference threshold.
///
/// `is_not_started` wins over everything else. The threshold is inclusive.
pub fn classify_status(difference: Weight, is_not_started: bool, threshold: Weight) -> Status {
    if is_not_started {
        return Status::NotStarted;
    }
    if difference.is_zero() {
        return Status::Balanced;
    }
    if difference.abs() <= threshold {
        Status::WithinThreshold
    } else {
        Status::OutOfThreshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(grams: i64) -> Weight {
        Weight::from_grams(grams)
    }

    #[test]
    fn zero_difference_is_balanced_for_any_threshold() {
        for threshold in [0, 1, 1_000, 50_000] {
            assert_eq!(classify_status(g(0), false, g(threshold)), Status::Balanced);
        }
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        assert_eq!(classify_status(g(2_000), false, g(2_000)), Status::WithinThreshold);
        assert_eq!(classify_status(g(-2_000), false, g(2_000)), Status::WithinThreshold);
        assert_eq!(classify_status(g(2_001), false, g(2_000)), Status::OutOfThreshold);
        assert_eq!(classify_status(g(-2_001), false, g(2_000)), Status::OutOfThreshold);
        assert_eq!(classify_status(g(1), false, g(0)), Status::OutOfThreshold);
    }

    #[test]
    fn not_started_takes_precedence() {
        assert_eq!(classify_status(g(0), true, g(0)), Status::NotStarted);
        assert_eq!(classify_status(g(9_000), true, g(0)), Status::NotStarted);
        assert_eq!(classify_status(g(-1), true, g(100)), Status::NotStarted);
    }

    #[test]
    fn serializes_as_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&Status::WithinThreshold).unwrap(),
            "\"WITHIN_THRESHOLD\""
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"NOT_STARTED\"").unwrap(),
            Status::NotStarted
        );
    }
}
