//! Confusion-matrix metrics for one group of rows at one threshold.
//!
//! # Columns
//!
//! | Column | Definition | Undefined when |
//! |--------|------------|----------------|
//! | Sen | TP / P, Wilson 95% CI | P = 0 |
//! | Spec | TN / N, Wilson 95% CI | N = 0 |
//! | Youden | Sen + Spec - 1 | either undefined |
//! | PPV | TP / PP | PP = 0 |
//! | NPV | TN / PN | PN = 0 |
//! | F1 | 2TP / (2TP + FP + FN) | no positives at all |
//! | Acc | (TP + TN) / Total | Total = 0 |
//! | AUC | Mann–Whitney, DeLong 95% CI | ≤ 5 distinct scores, one class |
//! | Far FN | GT, predicted negative, and negative even at the low far threshold | ≤ 5 distinct scores |
//! | Far FP | not GT, predicted positive, and positive even at the high far threshold | ≤ 5 distinct scores |
//! | `[lo, hi)` | scores inside the uncertainty band | ≤ 5 distinct scores |
//!
//! Undefined values are NaN in tabular output. Rows without a prediction
//! (null score, or unassigned in non-strict mode) do not enter the counts.

use super::confidence::{auc_estimate, proportion_estimate, Estimate, Interval};
use serde::{Deserialize, Serialize};

/// Score-derived statistics need strictly more distinct scores than this.
pub const MIN_DISTINCT_SCORES: usize = 5;

/// Default output columns, in display order.
pub const DEFAULT_TABLE_COLUMNS: &[&str] = &[
    "Total",
    "P",
    "N",
    "AUC",
    "AUC 95% CI Lower",
    "AUC 95% CI Upper",
    "PP",
    "PN",
    "TP",
    "FP",
    "FN",
    "TN",
    "Far FN",
    "Far FP",
    "Sen",
    "Sen 95% CI Lower",
    "Sen 95% CI Upper",
    "Spec",
    "Spec 95% CI Lower",
    "Spec 95% CI Upper",
    "Youden",
    "PPV",
    "NPV",
    "F1",
    "Acc",
];

/// Columns holding integer counts.
pub const COUNT_COLUMNS: &[&str] = &[
    "Total", "P", "N", "PP", "PN", "TP", "FP", "FN", "TN", "Far FN", "Far FP",
];

// =============================================================================
// Confusion Counts
// =============================================================================

/// The nine confusion-matrix counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    /// Rows counted.
    pub total: usize,
    /// Ground-truth positives.
    pub positives: usize,
    /// Ground-truth negatives.
    pub negatives: usize,
    /// Predicted positives.
    pub predicted_positive: usize,
    /// Predicted negatives.
    pub predicted_negative: usize,
    /// True positives.
    pub tp: usize,
    /// False positives.
    pub fp: usize,
    /// False negatives.
    pub fn_: usize,
    /// True negatives.
    pub tn: usize,
}

impl ConfusionCounts {
    /// Add one `(truth, prediction)` observation.
    pub fn record(&mut self, truth: bool, predicted: bool) {
        self.total += 1;
        match (truth, predicted) {
            (true, true) => self.tp += 1,
            (false, true) => self.fp += 1,
            (true, false) => self.fn_ += 1,
            (false, false) => self.tn += 1,
        }
        self.positives = self.tp + self.fn_;
        self.negatives = self.fp + self.tn;
        self.predicted_positive = self.tp + self.fp;
        self.predicted_negative = self.fn_ + self.tn;
    }

    /// Counts over paired labels and predictions.
    pub fn from_pairs(gt: &[bool], pred: &[bool]) -> Self {
        let mut counts = Self::default();
        for (&t, &p) in gt.iter().zip(pred) {
            counts.record(t, p);
        }
        counts
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        f64::NAN
    } else {
        num as f64 / den as f64
    }
}

// =============================================================================
// Metric Record
// =============================================================================

/// Every metric for one (group, threshold) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Confusion counts.
    pub counts: ConfusionCounts,
    /// Area under the ROC curve.
    pub auc: Estimate,
    /// True positive rate.
    pub sensitivity: Estimate,
    /// True negative rate.
    pub specificity: Estimate,
    /// Sen + Spec - 1.
    pub youden: f64,
    /// Positive predictive value.
    pub ppv: f64,
    /// Negative predictive value.
    pub npv: f64,
    /// F1 score.
    pub f1: f64,
    /// Accuracy.
    pub accuracy: f64,
    /// Severe misses; `None` when suppressed.
    pub far_fn: Option<usize>,
    /// Severe false alarms; `None` when suppressed.
    pub far_fp: Option<usize>,
    /// Count per uncertainty band, in configuration order; `None` when suppressed.
    pub uncertain: Vec<Option<usize>>,
}

impl MetricRecord {
    /// Value of a named column, NaN for undefined or suppressed metrics.
    ///
    /// Returns `None` for names that are not metric columns. Uncertainty band
    /// columns are positional and resolved by the table that owns the labels.
    pub fn value(&self, column: &str) -> Option<f64> {
        let c = &self.counts;
        let count = |n: usize| Some(n as f64);
        let opt = |n: Option<usize>| Some(n.map_or(f64::NAN, |n| n as f64));
        match column {
            "Total" => count(c.total),
            "P" => count(c.positives),
            "N" => count(c.negatives),
            "PP" => count(c.predicted_positive),
            "PN" => count(c.predicted_negative),
            "TP" => count(c.tp),
            "FP" => count(c.fp),
            "FN" => count(c.fn_),
            "TN" => count(c.tn),
            "AUC" => Some(self.auc.point),
            "AUC 95% CI Lower" => Some(self.auc.lower()),
            "AUC 95% CI Upper" => Some(self.auc.upper()),
            "Far FN" => opt(self.far_fn),
            "Far FP" => opt(self.far_fp),
            "Sen" => Some(self.sensitivity.point),
            "Sen 95% CI Lower" => Some(self.sensitivity.lower()),
            "Sen 95% CI Upper" => Some(self.sensitivity.upper()),
            "Spec" => Some(self.specificity.point),
            "Spec 95% CI Lower" => Some(self.specificity.lower()),
            "Spec 95% CI Upper" => Some(self.specificity.upper()),
            "Youden" => Some(self.youden),
            "PPV" => Some(self.ppv),
            "NPV" => Some(self.npv),
            "F1" => Some(self.f1),
            "Acc" => Some(self.accuracy),
            _ => None,
        }
    }

    /// Uncertainty count for band `index`, NaN when suppressed or absent.
    pub fn uncertain_value(&self, index: usize) -> f64 {
        self.uncertain
            .get(index)
            .copied()
            .flatten()
            .map_or(f64::NAN, |n| n as f64)
    }

    /// Column-wise maximum, ignoring undefined values.
    ///
    /// Used to reduce records that land on the same output labels.
    pub fn merge_max(&self, other: &Self) -> Self {
        let c = (&self.counts, &other.counts);
        let counts = ConfusionCounts {
            total: c.0.total.max(c.1.total),
            positives: c.0.positives.max(c.1.positives),
            negatives: c.0.negatives.max(c.1.negatives),
            predicted_positive: c.0.predicted_positive.max(c.1.predicted_positive),
            predicted_negative: c.0.predicted_negative.max(c.1.predicted_negative),
            tp: c.0.tp.max(c.1.tp),
            fp: c.0.fp.max(c.1.fp),
            fn_: c.0.fn_.max(c.1.fn_),
            tn: c.0.tn.max(c.1.tn),
        };
        let width = self.uncertain.len().max(other.uncertain.len());
        let uncertain = (0..width)
            .map(|i| {
                max_count(
                    self.uncertain.get(i).copied().flatten(),
                    other.uncertain.get(i).copied().flatten(),
                )
            })
            .collect();
        Self {
            counts,
            auc: max_estimate(self.auc, other.auc),
            sensitivity: max_estimate(self.sensitivity, other.sensitivity),
            specificity: max_estimate(self.specificity, other.specificity),
            youden: nan_max(self.youden, other.youden),
            ppv: nan_max(self.ppv, other.ppv),
            npv: nan_max(self.npv, other.npv),
            f1: nan_max(self.f1, other.f1),
            accuracy: nan_max(self.accuracy, other.accuracy),
            far_fn: max_count(self.far_fn, other.far_fn),
            far_fp: max_count(self.far_fp, other.far_fp),
            uncertain,
        }
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    // f64::max already returns the non-NaN operand.
    a.max(b)
}

fn max_count(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

fn max_estimate(a: Estimate, b: Estimate) -> Estimate {
    let interval = match (a.interval, b.interval) {
        (Some(x), Some(y)) => Some(Interval {
            lower: x.lower.max(y.lower),
            upper: x.upper.max(y.upper),
        }),
        (x, y) => x.or(y),
    };
    Estimate {
        point: nan_max(a.point, b.point),
        interval,
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Compute the full metric record for one group at one threshold.
///
/// All slices are row-aligned. `far_fn_pred` and `far_fp_pred` are the
/// predictions at the low and high far thresholds; `uncertain` holds one
/// flag vector per uncertainty band.
pub fn aggregate(
    gt: &[bool],
    scores: &[Option<f64>],
    pred: &[Option<bool>],
    far_fn_pred: &[Option<bool>],
    far_fp_pred: &[Option<bool>],
    uncertain: &[Vec<bool>],
) -> MetricRecord {
    let rows: Vec<usize> = (0..gt.len()).filter(|&i| pred[i].is_some()).collect();
    if rows.len() < gt.len() {
        log::debug!("{} rows without a prediction left out", gt.len() - rows.len());
    }

    let mut counts = ConfusionCounts::default();
    for &i in &rows {
        counts.record(gt[i], pred[i].unwrap_or(false));
    }

    let sensitivity = proportion_estimate(counts.tp, counts.positives);
    let specificity = proportion_estimate(counts.tn, counts.negatives);

    let labels: Vec<bool> = rows.iter().map(|&i| gt[i]).collect();
    let values: Vec<f64> = rows.iter().filter_map(|&i| scores[i]).collect();
    let score_based = labels.len() == values.len() && distinct(&values) > MIN_DISTINCT_SCORES;

    let (auc, far_fn, far_fp, uncertain) = if score_based {
        let auc = auc_estimate(&labels, &values).unwrap_or_else(|e| {
            log::debug!("AUC undefined: {e}");
            Estimate::UNDEFINED
        });
        let far_fn = rows
            .iter()
            .filter(|&&i| gt[i] && pred[i] == Some(false) && far_fn_pred[i] != Some(true))
            .count();
        let far_fp = rows
            .iter()
            .filter(|&&i| !gt[i] && pred[i] == Some(true) && far_fp_pred[i] == Some(true))
            .count();
        let bands = uncertain
            .iter()
            .map(|flags| Some(rows.iter().filter(|&&i| flags[i]).count()))
            .collect();
        (auc, Some(far_fn), Some(far_fp), bands)
    } else {
        (Estimate::UNDEFINED, None, None, vec![None; uncertain.len()])
    };

    MetricRecord {
        auc,
        sensitivity,
        specificity,
        youden: sensitivity.point + specificity.point - 1.0,
        ppv: ratio(counts.tp, counts.predicted_positive),
        npv: ratio(counts.tn, counts.predicted_negative),
        f1: ratio(2 * counts.tp, 2 * counts.tp + counts.fp + counts.fn_),
        accuracy: ratio(counts.tp + counts.tn, counts.total),
        far_fn,
        far_fp,
        uncertain,
        counts,
    }
}

/// Number of distinct values.
pub fn distinct(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}
