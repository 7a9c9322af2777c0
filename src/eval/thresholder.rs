//! Score → binary prediction, globally or per subset.
//!
//! A [`ThresholdSpec`] is an ordered list of rules. Each rule assigns
//! predictions to the rows it covers that are still unassigned, so earlier
//! rules win:
//!
//! ```text
//!   rules: [ Subset("scanner", {"X": 0.3}),  Subset("site", {"A": 0.6}),  Global(0.5) ]
//!
//!   row  scanner site   score  → assigned by   pred
//!   0    X       A      0.40     rule 0 (0.3)   true
//!   1    Y       A      0.55     rule 1 (0.6)   false
//!   2    Y       B      0.55     rule 2 (0.5)   true
//! ```
//!
//! Null scores always produce null predictions. In strict mode a row with a
//! score but no applicable rule is an error; otherwise it stays null.

use crate::preprocess::Frame;
use crate::table::Value;
use crate::types::Threshold;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One entry of a threshold spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdRule {
    /// Applies to every still-unassigned row.
    Global(f64),
    /// Applies to rows whose `column` value matches a key.
    Subset {
        /// Discriminator column.
        column: String,
        /// `(value, threshold)` pairs, tried in order.
        thresholds: Vec<(Value, f64)>,
    },
}

impl ThresholdRule {
    /// Per-subset rule over one discriminator column.
    pub fn subset<V, I>(column: impl Into<String>, thresholds: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = (V, f64)>,
    {
        ThresholdRule::Subset {
            column: column.into(),
            thresholds: thresholds.into_iter().map(|(v, t)| (v.into(), t)).collect(),
        }
    }
}

/// Ordered, first-match-wins list of threshold rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdSpec {
    rules: Vec<ThresholdRule>,
}

impl ThresholdSpec {
    /// A single global threshold.
    pub fn global(threshold: f64) -> Self {
        Self {
            rules: vec![ThresholdRule::Global(threshold)],
        }
    }

    /// Build from explicit rules.
    pub fn from_rules(rules: Vec<ThresholdRule>) -> Self {
        Self { rules }
    }

    /// Append a rule with lower priority than the existing ones.
    pub fn then(mut self, rule: ThresholdRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The rules in priority order.
    pub fn rules(&self) -> &[ThresholdRule] {
        &self.rules
    }

    /// The global threshold if the spec is exactly one global rule.
    pub fn as_global(&self) -> Option<f64> {
        match self.rules.as_slice() {
            [ThresholdRule::Global(t)] => Some(*t),
            _ => None,
        }
    }

    /// Discriminator columns the spec needs, in first-use order.
    pub fn subset_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for rule in &self.rules {
            if let ThresholdRule::Subset { column, .. } = rule {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }
        columns
    }

    /// Check every threshold value lies in [0, 1] and the spec is non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(Error::invalid_threshold("threshold spec has no rules"));
        }
        for rule in &self.rules {
            match rule {
                ThresholdRule::Global(t) => check(*t)?,
                ThresholdRule::Subset { thresholds, .. } => {
                    for (_, t) in thresholds {
                        check(*t)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for ThresholdSpec {
    fn default() -> Self {
        Self::global(Threshold::DEFAULT.get())
    }
}

impl From<f64> for ThresholdSpec {
    fn from(t: f64) -> Self {
        Self::global(t)
    }
}

impl From<Threshold> for ThresholdSpec {
    fn from(t: Threshold) -> Self {
        Self::global(t.get())
    }
}

fn check(t: f64) -> Result<()> {
    if (0.0..=1.0).contains(&t) {
        Ok(())
    } else {
        Err(Error::invalid_threshold(format!(
            "Threshold must be between 0 and 1. Threshold used: {t}"
        )))
    }
}

/// Apply `spec` to the frame's scores.
///
/// Threshold values are used exactly as given (no rounding); only sweep
/// candidates are rounded.
///
/// # Errors
///
/// [`Error::InvalidThreshold`] for out-of-range values or an unknown
/// discriminator column, and [`Error::UnresolvedThreshold`] in strict mode.
pub fn apply_threshold(frame: &Frame, spec: &ThresholdSpec, strict: bool) -> Result<Vec<Option<bool>>> {
    spec.validate()?;
    let scores = frame.scores();
    let mut assigned: Vec<Option<bool>> = vec![None; frame.len()];
    let mut covered = vec![false; frame.len()];

    for rule in spec.rules() {
        match rule {
            ThresholdRule::Global(t) => {
                for row in 0..frame.len() {
                    assign(row, *t, scores, &mut assigned, &mut covered);
                }
            }
            ThresholdRule::Subset { column, thresholds } => {
                let col = frame.column_index(column).ok_or_else(|| {
                    Error::invalid_threshold(format!("Column {column} not found in data"))
                })?;
                for (subset, t) in thresholds {
                    for row in 0..frame.len() {
                        if frame.value(row, col).loose_eq(subset) {
                            assign(row, *t, scores, &mut assigned, &mut covered);
                        }
                    }
                }
            }
        }
    }

    if strict {
        let unresolved = scores
            .iter()
            .zip(&covered)
            .filter(|(s, &c)| s.is_some() && !c)
            .count();
        if unresolved > 0 {
            return Err(Error::UnresolvedThreshold { unresolved });
        }
    }
    Ok(assigned)
}

fn assign(
    row: usize,
    threshold: f64,
    scores: &[Option<f64>],
    assigned: &mut [Option<bool>],
    covered: &mut [bool],
) {
    if covered[row] {
        return;
    }
    covered[row] = true;
    assigned[row] = scores[row].map(|s| s > threshold);
}

/// Single-threshold prediction over raw scores: `score > threshold`.
pub fn predict(scores: &[Option<f64>], threshold: f64) -> Vec<Option<bool>> {
    scores.iter().map(|s| s.map(|s| s > threshold)).collect()
}

// =============================================================================
// Uncertainty Bands
// =============================================================================

/// Half-open score band `[lower, upper)` counted as "uncertain".
///
/// Serialized as a `[lower, upper]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct UncertaintyBand {
    /// Inclusive lower bound.
    pub lower: f64,
    /// Exclusive upper bound.
    pub upper: f64,
}

impl UncertaintyBand {
    /// Create a band.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Whether `score` falls in the band.
    pub fn contains(&self, score: f64) -> bool {
        self.lower <= score && score < self.upper
    }

    /// Per-row flags. Null scores are never flagged.
    pub fn flags(&self, scores: &[Option<f64>]) -> Vec<bool> {
        scores
            .iter()
            .map(|s| s.map_or(false, |s| self.contains(s)))
            .collect()
    }

    /// Column label, e.g. `[0.4, 0.6)`.
    pub fn label(&self) -> String {
        format!("[{:?}, {:?})", self.lower, self.upper)
    }
}

impl From<(f64, f64)> for UncertaintyBand {
    fn from((lower, upper): (f64, f64)) -> Self {
        Self::new(lower, upper)
    }
}

impl From<UncertaintyBand> for (f64, f64) {
    fn from(band: UncertaintyBand) -> Self {
        (band.lower, band.upper)
    }
}
