use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

const GRAMS_PER_KG: i64 = 1000;

/// Signed weight represented as **integer grams**.
///
/// Use this type for **all** weights in the engine (entry weights, totals,
/// differences, thresholds, classification bounds) so that sums are exact
/// and a zero difference really is zero.
///
/// # Examples
///
/// ```rust
/// use engine::Weight;
///
/// let weight = Weight::from_grams(12_500);
/// assert_eq!(weight.grams(), 12500);
/// assert_eq!(weight.to_string(), "12.500 kg");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 3 decimals):
///
/// ```rust
/// use engine::Weight;
///
/// assert_eq!("10".parse::<Weight>().unwrap().grams(), 10_000);
/// assert_eq!("10,5".parse::<Weight>().unwrap().grams(), 10_500);
/// assert!("1.2345".parse::<Weight>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Weight(i64);

impl Weight {
    pub const ZERO: Weight = Weight(0);

    /// Creates a new weight from integer grams.
    #[must_use]
    pub const fn from_grams(grams: i64) -> Self {
        Self(grams)
    }

    /// Converts kilograms coming from the wire.
    ///
    /// Values must be whole grams (at most 3 decimals); anything finer is
    /// rejected instead of being rounded away.
    pub fn from_kg(kg: f64) -> Result<Self, EngineError> {
        if !kg.is_finite() {
            return Err(EngineError::InvalidWeight(format!(
                "weight must be a finite number, got {kg}"
            )));
        }
        let exact = kg * GRAMS_PER_KG as f64;
        let grams = exact.round();
        if grams.abs() > i64::MAX as f64 / 2.0 {
            return Err(EngineError::InvalidWeight("weight too large".to_string()));
        }
        // f64 noise only, e.g. 0.1 + 0.2
        let tolerance = (grams.abs() * f64::EPSILON * 8.0).max(1e-6);
        if (exact - grams).abs() > tolerance {
            return Err(EngineError::InvalidWeight(format!(
                "weight {kg} kg has more than 3 decimals"
            )));
        }
        Ok(Self(grams as i64))
    }

    /// Returns the raw value in grams.
    #[must_use]
    pub const fn grams(self) -> i64 {
        self.0
    }

    /// Returns the value in kilograms, for display and wire output.
    #[must_use]
    pub fn as_kg(self) -> f64 {
        self.0 as f64 / GRAMS_PER_KG as f64
    }

    /// Kilograms without unit and without trailing zero decimals (`"10.5"`).
    #[must_use]
    pub fn kg_string(self) -> String {
        let full = self.to_string();
        let number = full.trim_end_matches(" kg");
        let number = number.trim_end_matches('0').trim_end_matches('.');
        if number.is_empty() || number == "-" {
            "0".to_string()
        } else {
            number.to_string()
        }
    }

    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Returns `true` if the weight is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the weight is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the weight is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let kg = abs / GRAMS_PER_KG as u64;
        let grams = abs % GRAMS_PER_KG as u64;
        write!(f, "{sign}{kg}.{grams:03} kg")
    }
}

impl From<i64> for Weight {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Weight> for i64 {
    fn from(value: Weight) -> Self {
        value.0
    }
}

// Arithmetic saturates at the `i64` bounds: totals never panic.
impl Add for Weight {
    type Output = Weight;

    fn add(self, rhs: Weight) -> Self::Output {
        Weight(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Weight {
    fn add_assign(&mut self, rhs: Weight) {
        *self = *self + rhs;
    }
}

impl Sub for Weight {
    type Output = Weight;

    fn sub(self, rhs: Weight) -> Self::Output {
        Weight(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Weight>>(iter: I) -> Self {
        iter.fold(Weight::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Weight> for Weight {
    fn sum<I: Iterator<Item = &'a Weight>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Weight {
    type Err = EngineError;

    /// Parses a decimal kilogram string into grams.
    ///
    /// Accepts `.` or `,` as decimal separator, an optional leading `+`/`-`
    /// and an optional trailing `kg` unit.
    ///
    /// Validation rules:
    /// - max 3 fractional digits (rejects `1.2345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidWeight("empty weight".to_string());
        let invalid = || EngineError::InvalidWeight(format!("invalid weight: {s}"));
        let overflow = || EngineError::InvalidWeight("weight too large".to_string());

        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix("kg").unwrap_or(trimmed).trim_end();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim().replace(',', ".");
        if rest.is_empty() {
            return Err(empty());
        }

        let mut parts = rest.split('.');
        let kg_str = parts.next().ok_or_else(invalid)?;
        let grams_str = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        if kg_str.is_empty() || !kg_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let kg: i64 = kg_str.parse().map_err(|_| overflow())?;

        let grams: i64 = match grams_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                if frac.len() > 3 {
                    return Err(EngineError::InvalidWeight("too many decimals".to_string()));
                }
                let value: i64 = frac.parse().map_err(|_| invalid())?;
                value * 10_i64.pow(3 - frac.len() as u32)
            }
        };

        let total = kg
            .checked_mul(GRAMS_PER_KG)
            .and_then(|v| v.checked_add(grams))
            .ok_or_else(overflow)?;

        Ok(Weight(if negative { -total } else { total }))
    }
}
