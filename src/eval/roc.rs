//! ROC curve construction and rank-based AUC.
//!
//! The curve follows the reference construction used by common ML toolkits,
//! so operating points located on it agree with what analysts see elsewhere:
//!
//! 1. Sort by descending score (stable, so equal scores keep input order).
//! 2. Emit one point per distinct score with cumulative TP/FP counts.
//! 3. Drop intermediate points that are collinear with their neighbours.
//! 4. Prepend the `(0, 0)` point at threshold `+inf`.
//!
//! Points are in ascending FPR (descending threshold) order.

use crate::{Error, Result};

/// A single point on the ROC curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocPoint {
    /// Scores at or above this value are counted positive at this point.
    pub threshold: f64,
    /// False positive rate (1 - specificity).
    pub fpr: f64,
    /// True positive rate (sensitivity).
    pub tpr: f64,
}

impl RocPoint {
    /// True negative rate (specificity).
    #[must_use]
    pub fn tnr(&self) -> f64 {
        1.0 - self.fpr
    }
}

/// ROC curve over one set of labelled scores.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    /// Curve points, starting at `(0, 0)`.
    pub points: Vec<RocPoint>,
    /// Positive samples.
    pub positives: usize,
    /// Negative samples.
    pub negatives: usize,
}

impl RocCurve {
    /// Build the curve.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for empty or mismatched input, and
    /// [`Error::InsufficientClassDiversity`] when only one class is present.
    pub fn compute(labels: &[bool], scores: &[f64]) -> Result<Self> {
        validate(labels, scores)?;

        let positives = labels.iter().filter(|&&l| l).count();
        let negatives = labels.len() - positives;
        if positives == 0 || negatives == 0 {
            return Err(Error::InsufficientClassDiversity {
                positives,
                negatives,
            });
        }

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        // Cumulative counts at the last index of each distinct score.
        let mut tps: Vec<usize> = Vec::new();
        let mut fps: Vec<usize> = Vec::new();
        let mut thresholds: Vec<f64> = Vec::new();
        let mut tp = 0usize;
        for (rank, &i) in order.iter().enumerate() {
            if labels[i] {
                tp += 1;
            }
            let last_of_run = order
                .get(rank + 1)
                .map_or(true, |&next| scores[next] != scores[i]);
            if last_of_run {
                tps.push(tp);
                fps.push(rank + 1 - tp);
                thresholds.push(scores[i]);
            }
        }

        let keep = non_collinear(&tps, &fps);
        let mut points = Vec::with_capacity(keep.len() + 1);
        points.push(RocPoint {
            threshold: f64::INFINITY,
            fpr: 0.0,
            tpr: 0.0,
        });
        let (p, n) = (positives as f64, negatives as f64);
        for k in keep {
            points.push(RocPoint {
                threshold: thresholds[k],
                fpr: fps[k] as f64 / n,
                tpr: tps[k] as f64 / p,
            });
        }

        Ok(Self {
            points,
            positives,
            negatives,
        })
    }

    /// Sensitivity along the curve.
    pub fn tpr(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.tpr).collect()
    }

    /// Specificity along the curve.
    pub fn tnr(&self) -> Vec<f64> {
        self.points.iter().map(RocPoint::tnr).collect()
    }

    /// Area under the curve by the trapezoidal rule.
    pub fn auc(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].fpr - w[0].fpr) * (w[1].tpr + w[0].tpr) / 2.0)
            .sum()
    }
}

/// Indices kept after dropping collinear intermediate points.
///
/// A point survives when the second difference of either cumulative count
/// is non-zero at it; the first and last points always survive.
fn non_collinear(tps: &[usize], fps: &[usize]) -> Vec<usize> {
    let len = tps.len();
    if len <= 2 {
        return (0..len).collect();
    }
    let second_diff = |v: &[usize], i: usize| -> i64 {
        v[i + 1] as i64 - 2 * v[i] as i64 + v[i - 1] as i64
    };
    let mut keep = vec![0];
    for i in 1..len - 1 {
        if second_diff(fps, i) != 0 || second_diff(tps, i) != 0 {
            keep.push(i);
        }
    }
    keep.push(len - 1);
    keep
}

fn validate(labels: &[bool], scores: &[f64]) -> Result<()> {
    if scores.is_empty() {
        return Err(Error::invalid_input("empty input"));
    }
    if scores.len() != labels.len() {
        return Err(Error::invalid_input(format!(
            "scores length {} != labels length {}",
            scores.len(),
            labels.len()
        )));
    }
    if scores.iter().any(|s| s.is_nan()) {
        return Err(Error::invalid_input("scores contain NaN"));
    }
    Ok(())
}

/// Rank-based (Mann–Whitney) AUC with midranks for ties.
///
/// Equivalent to the trapezoidal area under the full ROC curve.
pub fn rank_auc(labels: &[bool], scores: &[f64]) -> Result<f64> {
    validate(labels, scores)?;
    let positives = labels.iter().filter(|&&l| l).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(Error::InsufficientClassDiversity {
            positives,
            negatives,
        });
    }

    let ranks = midranks(scores);
    let rank_sum: f64 = labels
        .iter()
        .zip(&ranks)
        .filter(|(&l, _)| l)
        .map(|(_, &r)| r)
        .sum();
    let (p, n) = (positives as f64, negatives as f64);
    Ok((rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}

/// 1-based ranks with ties sharing their average rank.
pub(crate) fn midranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        let rank = (start + end) as f64 / 2.0 + 1.0;
        for &i in &order[start..=end] {
            ranks[i] = rank;
        }
        start = end + 1;
    }
    ranks
}
