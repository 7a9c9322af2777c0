//! Row preprocessing: column checks, null filtering, and type coercion.
//!
//! [`preprocess`] turns a loosely typed [`Table`] into a [`Frame`]: ground
//! truth coerced to a boolean label, score coerced to `f64`, and every other
//! retained column (strata, per-subset threshold discriminators) carried as
//! raw [`Value`]s.
//!
//! ```text
//!   Table (gt, score, site, scanner, ...)
//!        │  check_columns   → MissingColumns([...])
//!        │  drop nulls      (NullPolicy::Any | All over required columns)
//!        │  coerce          gt → bool, score → Option<f64>
//!        ▼
//!   Frame { gt, score, columns: [site, scanner] }
//! ```

use crate::table::{Table, Value};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// How nulls in the required columns drop a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullPolicy {
    /// Drop the row if any required column is null.
    #[default]
    Any,
    /// Drop the row only if every required column is null.
    All,
}

/// Names of required columns missing from `table`, in request order.
pub fn check_columns<S: AsRef<str>>(table: &Table, columns: &[S]) -> Vec<String> {
    columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| !table.has_column(c))
        .map(String::from)
        .collect()
}

/// Preprocessed rows: typed ground truth and score plus raw auxiliary columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    gt: Vec<bool>,
    score: Vec<Option<f64>>,
    columns: Vec<String>,
    values: Vec<Vec<Value>>,
}

impl Frame {
    /// Build a frame directly from typed columns.
    pub fn new(gt: Vec<bool>, score: Vec<Option<f64>>) -> Result<Self> {
        if gt.len() != score.len() {
            return Err(Error::invalid_input(format!(
                "gt has {} rows, score has {}",
                gt.len(),
                score.len()
            )));
        }
        let values = vec![Vec::new(); gt.len()];
        Ok(Self {
            gt,
            score,
            columns: Vec::new(),
            values,
        })
    }

    /// Attach an auxiliary column.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Result<Self> {
        if values.len() != self.gt.len() {
            return Err(Error::invalid_input(format!(
                "column has {} values, frame has {} rows",
                values.len(),
                self.gt.len()
            )));
        }
        self.columns.push(name.into());
        for (row, v) in self.values.iter_mut().zip(values) {
            row.push(v);
        }
        Ok(self)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.gt.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.gt.is_empty()
    }

    /// Ground-truth labels.
    pub fn gt(&self) -> &[bool] {
        &self.gt
    }

    /// Scores; `None` where the source cell was null.
    pub fn scores(&self) -> &[Option<f64>] {
        &self.score
    }

    /// Auxiliary column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of an auxiliary column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell of an auxiliary column.
    pub fn value(&self, row: usize, col: usize) -> &Value {
        &self.values[row][col]
    }

    /// Rows restricted to `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            gt: indices.iter().map(|&i| self.gt[i]).collect(),
            score: indices.iter().map(|&i| self.score[i]).collect(),
            columns: self.columns.clone(),
            values: indices.iter().map(|&i| self.values[i].clone()).collect(),
        }
    }

    /// Replace each multi-valued cell of `column` by one row per contained value.
    ///
    /// All other fields are duplicated. Scalar cells are kept as they are and
    /// empty lists drop their row.
    pub fn explode(&self, column: &str) -> Result<Self> {
        let col = self
            .column_index(column)
            .ok_or_else(|| Error::MissingColumns(vec![column.to_string()]))?;

        let mut out = Self {
            columns: self.columns.clone(),
            ..Self::default()
        };
        for row in 0..self.len() {
            match &self.values[row][col] {
                Value::List(items) => {
                    for item in items {
                        let mut values = self.values[row].clone();
                        values[col] = item.clone();
                        out.gt.push(self.gt[row]);
                        out.score.push(self.score[row]);
                        out.values.push(values);
                    }
                }
                _ => {
                    out.gt.push(self.gt[row]);
                    out.score.push(self.score[row]);
                    out.values.push(self.values[row].clone());
                }
            }
        }
        Ok(out)
    }
}

/// Filter and coerce `table` for evaluation.
///
/// `required` lists the ground-truth column, the score column, then any
/// strata; these are null-filtered according to `policy`. `extra` columns
/// (threshold discriminators) are carried along but never filtered on.
/// Missing columns across both lists are reported together.
///
/// Rows with a null ground truth are always dropped, since a label is
/// required for every evaluated row. Under [`NullPolicy::All`] a null score
/// survives as `None` and a null stratum survives as [`Value::Null`].
pub fn preprocess<S: AsRef<str>>(
    table: &Table,
    required: &[S],
    extra: &[S],
    policy: NullPolicy,
) -> Result<Frame> {
    if required.len() < 2 {
        return Err(Error::invalid_input(
            "preprocessing needs at least a ground-truth and a score column",
        ));
    }

    let all: Vec<&str> = required.iter().chain(extra).map(AsRef::as_ref).collect();
    let missing = check_columns(table, &all);
    if !missing.is_empty() {
        return Err(Error::MissingColumns(missing));
    }

    let required: Vec<&str> = required.iter().map(AsRef::as_ref).collect();
    let gt_name = required[0];
    let score_name = required[1];
    let index = |name: &str| table.column_index(name).unwrap_or_default();
    let required_idx: Vec<usize> = required.iter().map(|c| index(*c)).collect();
    let gt_idx = required_idx[0];
    let score_idx = required_idx[1];

    // Strata and discriminators may name the ground-truth or score column;
    // those are carried again as raw values.
    let extra: Vec<&str> = extra.iter().map(AsRef::as_ref).collect();
    let mut aux: Vec<&str> = Vec::new();
    for name in required[2..].iter().chain(extra.iter()) {
        if !aux.contains(name) {
            aux.push(*name);
        }
    }
    let aux_idx: Vec<usize> = aux.iter().map(|c| index(*c)).collect();

    let mut frame = Frame {
        columns: aux.iter().map(|c| c.to_string()).collect(),
        ..Frame::default()
    };
    let mut dropped = 0usize;

    for row in table.rows() {
        let nulls = required_idx.iter().filter(|&&i| row[i].is_null()).count();
        let drop = match policy {
            NullPolicy::Any => nulls > 0,
            NullPolicy::All => nulls == required_idx.len(),
        };
        if drop || row[gt_idx].is_null() {
            dropped += 1;
            continue;
        }

        frame.gt.push(coerce_label(gt_name, &row[gt_idx])?);
        frame.score.push(coerce_score(score_name, &row[score_idx])?);
        frame
            .values
            .push(aux_idx.iter().map(|&i| row[i].clone()).collect());
    }

    log::debug!(
        "preprocess: kept {} of {} rows ({} dropped for nulls)",
        frame.len(),
        table.len(),
        dropped
    );
    Ok(frame)
}

/// Integer cast then truthiness: any non-zero label is positive.
fn coerce_label(column: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Int(i) => Ok(*i != 0),
        Value::Float(f) if f.is_finite() => Ok(f.trunc() != 0.0),
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(|i| i != 0)
            .map_err(|_| Error::coercion(column, value)),
        other => Err(Error::coercion(column, other)),
    }
}

fn coerce_score(column: &str, value: &Value) -> Result<Option<f64>> {
    if value.is_null() {
        return Ok(None);
    }
    match value {
        Value::List(_) => Err(Error::coercion(column, value)),
        other => other
            .as_f64()
            .map(Some)
            .ok_or_else(|| Error::coercion(column, other)),
    }
}

// =============================================================================
// Column Combination
// =============================================================================

/// How several label columns are merged into one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "method")]
pub enum CombineMethod {
    /// Most frequent non-null value; ties go to the smallest value.
    Majority,
    /// Binary columns only: positive when more than `requirement` of the
    /// columns vote 1.
    Supermajority {
        /// Fraction of columns that must agree, strictly within (0, 1).
        requirement: f64,
    },
    /// First non-null value in column order.
    Preference,
    /// Positive if any non-null value is truthy.
    Union,
    /// Positive if every non-null value is truthy.
    Intersection,
}

impl Default for CombineMethod {
    fn default() -> Self {
        CombineMethod::Supermajority {
            requirement: 2.0 / 3.0,
        }
    }
}

/// Combine label columns row by row.
///
/// Columns absent from `table` are ignored. With `strict`, a row with any
/// null input yields null; otherwise only rows with all inputs null do.
///
/// # Example
///
/// ```rust
/// use strateval::preprocess::{combine_columns, CombineMethod};
/// use strateval::table::{Table, Value};
///
/// let mut table = Table::new(["r1", "r2", "r3"]);
/// table.push_row(vec![Value::Int(1), Value::Int(1), Value::Int(0)]).unwrap();
/// table.push_row(vec![Value::Int(0), Value::Null, Value::Null]).unwrap();
///
/// let combined = combine_columns(&table, &["r1", "r2", "r3"], CombineMethod::Preference, false).unwrap();
/// assert_eq!(combined, vec![Some(1.0), Some(0.0)]);
/// ```
pub fn combine_columns<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
    method: CombineMethod,
    strict: bool,
) -> Result<Vec<Option<f64>>> {
    let idx: Vec<usize> = columns
        .iter()
        .filter_map(|c| table.column_index(c.as_ref()))
        .collect();

    if let CombineMethod::Supermajority { requirement } = method {
        if !(requirement > 0.0 && requirement < 1.0) {
            return Err(Error::invalid_input(
                "Supermajority requirement must be between 0 and 1",
            ));
        }
    }

    let mut out = Vec::with_capacity(table.len());
    for row in table.rows() {
        let cells: Vec<&Value> = idx.iter().map(|&i| &row[i]).collect();
        let nulls = cells.iter().filter(|v| v.is_null()).count();
        let masked = if strict { nulls > 0 } else { nulls == cells.len() };

        let combined = combine_row(&cells, method, idx.len())?;
        out.push(if masked { None } else { combined });
    }
    Ok(out)
}

fn combine_row(cells: &[&Value], method: CombineMethod, n_columns: usize) -> Result<Option<f64>> {
    let present: Vec<&Value> = cells.iter().copied().filter(|v| !v.is_null()).collect();

    let combined = match method {
        CombineMethod::Majority => {
            let mut numbers: Vec<f64> = present.iter().filter_map(|v| v.as_f64()).collect();
            numbers.sort_by(f64::total_cmp);
            let mut best: Option<(f64, usize)> = None;
            for run in numbers.chunk_by(|a, b| a == b) {
                if best.map_or(true, |(_, n)| run.len() > n) {
                    best = Some((run[0], run.len()));
                }
            }
            best.map(|(v, _)| v)
        }
        CombineMethod::Supermajority { requirement } => {
            let mut votes = 0usize;
            for v in &present {
                match v.as_f64() {
                    Some(x) if x == 0.0 || x == 1.0 => votes += x as usize,
                    _ => {
                        return Err(Error::invalid_input(
                            "Supermajority can only be used on binary data",
                        ))
                    }
                }
            }
            let needed = (n_columns as f64 * requirement).floor() as usize;
            Some(if votes > needed { 1.0 } else { 0.0 })
        }
        CombineMethod::Preference => present.first().and_then(|v| v.as_f64()),
        CombineMethod::Union => Some(bool_to_f64(present.iter().any(|v| v.truthy() == Some(true)))),
        CombineMethod::Intersection => {
            Some(bool_to_f64(present.iter().all(|v| v.truthy() == Some(true))))
        }
    };
    Ok(combined)
}

fn bool_to_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
