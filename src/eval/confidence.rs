//! Point estimates with optional 95% confidence intervals.
//!
//! Interval estimation can fail on degenerate inputs (one class, zero
//! variance). That is not an evaluation failure: the point estimate is still
//! reported and the bounds become NaN. [`Estimate::interval`] being `None` is
//! that branch, kept explicit instead of hidden behind a caught error.
//!
//! # Estimators
//!
//! | Metric | Point | Interval |
//! |--------|-------|----------|
//! | Sensitivity | TP / P | Wilson score |
//! | Specificity | TN / N | Wilson score |
//! | AUC | Mann–Whitney | DeLong variance, normal approximation |

use super::roc::{midranks, rank_auc};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Two-sided 95% standard normal quantile.
pub const Z_95: f64 = 1.959_963_984_540_054;

/// Closed interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

impl Interval {
    /// Whether `value` lies inside the interval.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// A point estimate, with bounds when they could be computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Point estimate; NaN when undefined.
    pub point: f64,
    /// 95% interval, if estimable.
    pub interval: Option<Interval>,
}

impl Estimate {
    /// An undefined estimate.
    pub const UNDEFINED: Self = Self {
        point: f64::NAN,
        interval: None,
    };

    /// Estimate without interval.
    pub fn point(point: f64) -> Self {
        Self {
            point,
            interval: None,
        }
    }

    /// Estimate with interval.
    pub fn with_interval(point: f64, interval: Interval) -> Self {
        Self {
            point,
            interval: Some(interval),
        }
    }

    /// Lower bound, NaN without interval.
    pub fn lower(&self) -> f64 {
        self.interval.map_or(f64::NAN, |i| i.lower)
    }

    /// Upper bound, NaN without interval.
    pub fn upper(&self) -> f64 {
        self.interval.map_or(f64::NAN, |i| i.upper)
    }
}

/// Wilson score interval for `successes` out of `trials`.
///
/// # Errors
///
/// [`Error::ConfidenceInterval`] when `trials == 0`.
pub fn wilson_interval(successes: usize, trials: usize, z: f64) -> Result<Interval> {
    if trials == 0 {
        return Err(Error::confidence_interval("no trials"));
    }
    let n = trials as f64;
    let p_hat = successes.min(trials) as f64 / n;
    let z2 = z * z;

    let denom = 1.0 + z2 / n;
    let center = (p_hat + z2 / (2.0 * n)) / denom;
    let radius = z * (p_hat * (1.0 - p_hat) / n + z2 / (4.0 * n * n)).sqrt() / denom;
    Ok(Interval {
        lower: (center - radius).clamp(0.0, 1.0),
        upper: (center + radius).clamp(0.0, 1.0),
    })
}

/// Proportion with its Wilson interval; undefined when there are no trials.
pub fn proportion_estimate(successes: usize, trials: usize) -> Estimate {
    if trials == 0 {
        return Estimate::UNDEFINED;
    }
    let point = successes as f64 / trials as f64;
    match wilson_interval(successes, trials, Z_95) {
        Ok(interval) => Estimate::with_interval(point, interval),
        Err(_) => Estimate::point(point),
    }
}

/// AUC with DeLong variance.
///
/// Needs at least two positives and two negatives, and a non-degenerate
/// variance.
///
/// # Errors
///
/// [`Error::InsufficientClassDiversity`] for a single class, and
/// [`Error::ConfidenceInterval`] when the variance cannot be estimated.
pub fn delong_auc(labels: &[bool], scores: &[f64], z: f64) -> Result<Estimate> {
    let positives: Vec<f64> = pick(labels, scores, true);
    let negatives: Vec<f64> = pick(labels, scores, false);
    let (m, n) = (positives.len(), negatives.len());
    if m == 0 || n == 0 {
        return Err(Error::InsufficientClassDiversity {
            positives: m,
            negatives: n,
        });
    }
    if m < 2 || n < 2 {
        return Err(Error::confidence_interval(format!(
            "DeLong needs two samples per class, got {m} positive and {n} negative"
        )));
    }

    let tx = midranks(&positives);
    let ty = midranks(&negatives);
    let combined: Vec<f64> = positives.iter().chain(&negatives).copied().collect();
    let tz = midranks(&combined);

    let (mf, nf) = (m as f64, n as f64);
    let auc = tz[..m].iter().sum::<f64>() / (mf * nf) - (mf + 1.0) / (2.0 * nf);

    let v01: Vec<f64> = (0..m).map(|i| (tz[i] - tx[i]) / nf).collect();
    let v10: Vec<f64> = (0..n).map(|j| 1.0 - (tz[m + j] - ty[j]) / mf).collect();
    let variance = sample_variance(&v01) / mf + sample_variance(&v10) / nf;

    if !variance.is_finite() || variance <= 0.0 {
        return Err(Error::confidence_interval(format!(
            "degenerate DeLong variance {variance}"
        )));
    }

    let half = z * variance.sqrt();
    Ok(Estimate::with_interval(
        auc,
        Interval {
            lower: (auc - half).clamp(0.0, 1.0),
            upper: (auc + half).clamp(0.0, 1.0),
        },
    ))
}

/// AUC with interval, falling back to the plain rank AUC without bounds.
///
/// # Errors
///
/// Only when no AUC is defined at all (single class, empty input).
pub fn auc_estimate(labels: &[bool], scores: &[f64]) -> Result<Estimate> {
    match delong_auc(labels, scores, Z_95) {
        Ok(estimate) => Ok(estimate),
        Err(Error::ConfidenceInterval(reason)) => {
            log::warn!("AUC interval unavailable ({reason}); reporting point estimate");
            Ok(Estimate::point(rank_auc(labels, scores)?))
        }
        Err(other) => Err(other),
    }
}

fn pick(labels: &[bool], scores: &[f64], class: bool) -> Vec<f64> {
    labels
        .iter()
        .zip(scores)
        .filter(|(&l, _)| l == class)
        .map(|(_, &s)| s)
        .collect()
}

fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
}
