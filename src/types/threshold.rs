//! Witness type for decision thresholds bounded to [0.0, 1.0].
//!
//! Every threshold that reaches the thresholder or the output table has been
//! rounded to 3 decimals and clamped into the unit interval. Rounding is
//! half-to-even on the value scaled by 1000, so `0.5001` and `0.5` collapse
//! onto the same threshold and are evaluated once.
//!
//! ```text
//!   candidate        rounded     stored
//!   ─────────        ───────     ──────
//!   0.5001      →    0.5     →   500 (milli)
//!   0.4999      →    0.5     →   500
//!   1.7         →    1.7     →   1000   (saturating only)
//!   +inf        →    inf     →   1000   (saturating only)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of decimals kept on every reported threshold.
pub const THRESHOLD_DECIMALS: i32 = 3;

const SCALE: f64 = 1000.0;

/// Round half-to-even at 3 decimals.
#[must_use]
#[inline]
pub fn round3(value: f64) -> f64 {
    (value * SCALE).round_ties_even() / SCALE
}

/// A decision threshold guaranteed to be in [0.0, 1.0] with at most 3 decimals.
///
/// # Construction
///
/// - [`Threshold::new`]: Returns `None` if out of range (strict)
/// - [`Threshold::saturating`]: Rounds then clamps to [0, 1]
/// - [`Threshold::try_from`]: Returns `Err` if out of range
///
/// # Example
///
/// ```rust
/// use strateval::types::Threshold;
///
/// assert!(Threshold::new(0.5).is_some());
/// assert!(Threshold::new(1.5).is_none());
///
/// let t = Threshold::saturating(0.50049);
/// assert_eq!(t.get(), 0.5);
/// assert_eq!(Threshold::saturating(f64::INFINITY).get(), 1.0);
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    /// The lowest threshold: every positive score predicts positive.
    pub const MIN: Self = Self(0.0);

    /// The highest threshold: nothing predicts positive.
    pub const MAX: Self = Self(1.0);

    /// The conventional default decision threshold.
    pub const DEFAULT: Self = Self(0.5);

    /// Create a threshold, returning `None` if out of range or NaN.
    #[must_use]
    #[inline]
    pub fn new(value: f64) -> Option<Self> {
        if (0.0..=1.0).contains(&value) {
            Some(Self(round3(value)))
        } else {
            None
        }
    }

    /// Round to 3 decimals, then clamp into [0.0, 1.0].
    ///
    /// Infinities saturate to the nearest bound. NaN is treated as 0.0.
    #[must_use]
    #[inline]
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(round3(value).clamp(0.0, 1.0))
    }

    /// Get the inner value.
    #[must_use]
    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Integer key in thousandths, exact for deduplication and ordering.
    #[must_use]
    #[inline]
    pub fn milli(self) -> u16 {
        (self.0 * SCALE).round() as u16
    }

    /// Rebuild a threshold from its thousandths key.
    #[must_use]
    #[inline]
    pub fn from_milli(milli: u16) -> Self {
        Self(f64::from(milli.min(1000)) / SCALE)
    }

    /// Binary decision for a score (`score > threshold`).
    #[must_use]
    #[inline]
    pub fn predicts(self, score: f64) -> bool {
        score > self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Threshold({:.3})", self.0)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Error when trying to create a Threshold from an invalid value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdError {
    /// The invalid value that was provided.
    pub value: f64,
}

impl fmt::Display for ThresholdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Threshold must be between 0 and 1. Threshold used: {}",
            self.value
        )
    }
}

impl std::error::Error for ThresholdError {}

impl TryFrom<f64> for Threshold {
    type Error = ThresholdError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ThresholdError { value })
    }
}

impl From<Threshold> for f64 {
    #[inline]
    fn from(t: Threshold) -> Self {
        t.0
    }
}

impl From<ThresholdError> for crate::Error {
    fn from(err: ThresholdError) -> Self {
        crate::Error::invalid_threshold(err.to_string())
    }
}

impl Eq for Threshold {}

impl PartialOrd for Threshold {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Threshold {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.milli().cmp(&other.milli())
    }
}

impl std::hash::Hash for Threshold {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.milli().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid() {
        assert!(Threshold::new(0.0).is_some());
        assert!(Threshold::new(0.5).is_some());
        assert!(Threshold::new(1.0).is_some());
    }

    #[test]
    fn new_invalid() {
        assert!(Threshold::new(-0.1).is_none());
        assert!(Threshold::new(1.1).is_none());
        assert!(Threshold::new(f64::NAN).is_none());
        assert!(Threshold::new(f64::INFINITY).is_none());
    }

    #[test]
    fn rounds_to_three_decimals() {
        assert_eq!(Threshold::new(0.5001).unwrap().get(), 0.5);
        assert_eq!(Threshold::new(0.12345).unwrap().get(), 0.123);
        assert_eq!(Threshold::new(0.7777).unwrap().get(), 0.778);
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round3(0.0625), 0.062);
        assert_eq!(round3(0.1875), 0.188);
    }

    #[test]
    fn saturating_clamps() {
        assert_eq!(Threshold::saturating(-1.0).get(), 0.0);
        assert_eq!(Threshold::saturating(2.0).get(), 1.0);
        assert_eq!(Threshold::saturating(f64::INFINITY).get(), 1.0);
        assert_eq!(Threshold::saturating(f64::NAN).get(), 0.0);
    }

    #[test]
    fn milli_round_trip() {
        for m in [0u16, 1, 499, 500, 999, 1000] {
            assert_eq!(Threshold::from_milli(m).milli(), m);
        }
        assert_eq!(Threshold::new(0.5).unwrap().milli(), 500);
    }

    #[test]
    fn near_duplicates_compare_equal() {
        let a = Threshold::new(0.5).unwrap();
        let b = Threshold::new(0.5001).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
    }

    #[test]
    fn predicts_is_strict_greater_than() {
        let t = Threshold::new(0.5).unwrap();
        assert!(t.predicts(0.51));
        assert!(!t.predicts(0.5));
        assert!(!Threshold::MAX.predicts(1.0));
    }

    #[test]
    fn try_from_f64() {
        let ok: Result<Threshold, _> = 0.5_f64.try_into();
        assert!(ok.is_ok());

        let err: Result<Threshold, _> = 1.5_f64.try_into();
        assert!(err.is_err());
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", Threshold::new(0.25).unwrap()), "0.250");
    }

    #[test]
    fn serde_roundtrip() {
        let t = Threshold::new(0.85).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "0.85");
        let restored: Threshold = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, t);
        assert!(serde_json::from_str::<Threshold>("1.5").is_err());
    }
}
