//! Threshold resolution from ROC operating points.
//!
//! Given a target sensitivity or specificity, locate the curve point whose
//! rate is the smallest value at or above the target ("nearest from above")
//! and return its threshold. Ties go to the first point in curve order.
//!
//! ```text
//!   tpr along curve:  0.0  0.25  0.5  0.75  0.75  1.0
//!   target 0.7   →  smallest tpr ≥ 0.7 is 0.75, first hit at index 3
//! ```
//!
//! The Youden threshold uses the same search on `tpr - tnr` with target 0,
//! i.e. the first point where sensitivity catches up with specificity.
//!
//! Resolved thresholds are rounded to 3 decimals and clamped to [0, 1]; the
//! leading `+inf` point therefore resolves to `1.0`.

use super::roc::RocCurve;
use crate::types::Threshold;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which rate an operating-point target refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// True positive rate.
    Sensitivity,
    /// True negative rate.
    Specificity,
}

/// Index of the first element equal to the smallest value `>= target`.
pub fn nearest_from_above(values: &[f64], target: f64) -> Option<usize> {
    let floor = values
        .iter()
        .copied()
        .filter(|&v| v >= target)
        .min_by(f64::total_cmp)?;
    values.iter().position(|&v| v == floor)
}

/// Threshold whose operating point on `axis` is nearest `target` from above.
///
/// # Errors
///
/// [`Error::InsufficientClassDiversity`] if only one class is present, and
/// [`Error::UnreachableTarget`] if no point reaches the target.
pub fn resolve_by_operating_point(
    gt: &[bool],
    scores: &[f64],
    target: f64,
    axis: Axis,
) -> Result<Threshold> {
    let curve = RocCurve::compute(gt, scores)?;
    threshold_on_curve(&curve, target, axis)
}

/// Youden crossover threshold: the first point where `tpr - tnr >= 0` is smallest.
pub fn resolve_youden(gt: &[bool], scores: &[f64]) -> Result<Threshold> {
    let curve = RocCurve::compute(gt, scores)?;
    youden_on_curve(&curve)
}

/// Resolve an operating point on an already computed curve.
pub fn threshold_on_curve(curve: &RocCurve, target: f64, axis: Axis) -> Result<Threshold> {
    let rates = match axis {
        Axis::Sensitivity => curve.tpr(),
        Axis::Specificity => curve.tnr(),
    };
    let idx = nearest_from_above(&rates, target).ok_or(Error::UnreachableTarget { target })?;
    Ok(Threshold::saturating(curve.points[idx].threshold))
}

/// Resolve the Youden crossover on an already computed curve.
pub fn youden_on_curve(curve: &RocCurve) -> Result<Threshold> {
    let gap: Vec<f64> = curve.points.iter().map(|p| p.tpr - p.tnr()).collect();
    let idx = nearest_from_above(&gap, 0.0).ok_or(Error::UnreachableTarget { target: 0.0 })?;
    Ok(Threshold::saturating(curve.points[idx].threshold))
}

// =============================================================================
// Sweep Ranges and Deduplication
// =============================================================================

/// Half-open arithmetic range `[start, stop)` with a fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRange {
    /// First value.
    pub start: f64,
    /// Exclusive upper bound.
    pub stop: f64,
    /// Increment; must be positive and finite.
    pub step: f64,
}

impl LinearRange {
    /// Create a range.
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// An empty range.
    pub fn empty() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// Materialize the values: `start + i * step` for `i < ceil((stop - start) / step)`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the step is not positive and finite.
    pub fn values(&self) -> Result<Vec<f64>> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(Error::invalid_input(format!(
                "range step must be positive, got {}",
                self.step
            )));
        }
        let span = (self.stop - self.start) / self.step;
        if !span.is_finite() || span <= 0.0 {
            return Ok(Vec::new());
        }
        let n = span.ceil() as usize;
        Ok((0..n).map(|i| self.start + i as f64 * self.step).collect())
    }
}

/// Ordered, deduplicated set of thresholds.
///
/// Candidates are rounded and clamped on insertion; a candidate equal to one
/// already present (after rounding) is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThresholdSet {
    inner: BTreeSet<Threshold>,
}

impl ThresholdSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw candidate. Returns `false` if it collapsed onto an existing one.
    pub fn insert(&mut self, candidate: f64) -> bool {
        self.inner.insert(Threshold::saturating(candidate))
    }

    /// Insert an already validated threshold.
    pub fn insert_threshold(&mut self, threshold: Threshold) -> bool {
        self.inner.insert(threshold)
    }

    /// Number of distinct thresholds.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Thresholds in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Threshold> + '_ {
        self.inner.iter().copied()
    }
}

impl Extend<f64> for ThresholdSet {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for candidate in iter {
            self.insert(candidate);
        }
    }
}

impl FromIterator<f64> for ThresholdSet {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
