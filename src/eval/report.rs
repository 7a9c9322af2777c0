//! Evaluation output: the indexed metric table and the no-data sentinel.

use super::metrics::{MetricRecord, COUNT_COLUMNS};
use crate::types::Threshold;
use crate::Result;
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Number, Value as Json};
use std::fmt;

pub use super::metrics::DEFAULT_TABLE_COLUMNS;

/// Message attached to empty evaluations.
pub const NO_DATA_MESSAGE: &str = "No data available after preprocessing";

/// Index column added in sweep mode.
pub const THRESHOLD_INDEX: &str = "Threshold";

// =============================================================================
// Outcome
// =============================================================================

/// Why an evaluation produced no table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoDataReason {
    /// Required columns are absent from the input.
    MissingColumns(Vec<String>),
    /// No rows survived preprocessing.
    Empty {
        /// Stratum columns of the attempted evaluation.
        strata: Vec<String>,
    },
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDataReason::MissingColumns(columns) => write!(f, "Missing columns: {columns:?}"),
            NoDataReason::Empty { strata } => write!(f, "{NO_DATA_MESSAGE} ({strata:?})"),
        }
    }
}

/// Result of an evaluation call that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutcome {
    /// Metrics were computed.
    Evaluated(MetricTable),
    /// Nothing to evaluate; carries the reason.
    NoData(NoDataReason),
}

impl EvalOutcome {
    /// The table, if any.
    pub fn table(&self) -> Option<&MetricTable> {
        match self {
            EvalOutcome::Evaluated(table) => Some(table),
            EvalOutcome::NoData(_) => None,
        }
    }

    /// Consume into the table, if any.
    pub fn into_table(self) -> Option<MetricTable> {
        match self {
            EvalOutcome::Evaluated(table) => Some(table),
            EvalOutcome::NoData(_) => None,
        }
    }

    /// Whether this is the no-data sentinel.
    pub fn is_no_data(&self) -> bool {
        matches!(self, EvalOutcome::NoData(_))
    }
}

// =============================================================================
// Metric Table
// =============================================================================

/// One output row: stratum labels, optional sweep threshold, metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    /// Stratum values rendered as labels, one per index column.
    pub labels: Vec<String>,
    /// Threshold of this row in sweep mode.
    pub threshold: Option<Threshold>,
    /// The metrics.
    pub record: MetricRecord,
}

/// Metrics indexed by stratum labels (and threshold in sweep mode).
///
/// Rows are immutable once assembled; column selection returns a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    strata: Vec<String>,
    columns: Vec<String>,
    bands: Vec<String>,
    rows: Vec<MetricRow>,
    sweep: bool,
}

impl MetricTable {
    /// Assemble a single-threshold table.
    ///
    /// `bands` are the uncertainty band labels in record order; they become
    /// addressable as columns.
    pub fn new(strata: Vec<String>, columns: Vec<String>, bands: Vec<String>, rows: Vec<MetricRow>) -> Self {
        Self {
            strata,
            columns,
            bands,
            rows,
            sweep: false,
        }
    }

    /// Assemble a sweep table, indexed by strata and threshold even when empty.
    pub fn sweep(strata: Vec<String>, columns: Vec<String>, bands: Vec<String>, rows: Vec<MetricRow>) -> Self {
        Self {
            sweep: true,
            ..Self::new(strata, columns, bands, rows)
        }
    }

    /// Index column names: strata, then `Threshold` for sweeps.
    pub fn index_names(&self) -> Vec<String> {
        let mut names = self.strata.clone();
        if self.is_sweep() {
            names.push(THRESHOLD_INDEX.to_string());
        }
        names
    }

    /// Stratum column names.
    pub fn strata(&self) -> &[String] {
        &self.strata
    }

    /// Displayed metric columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in index order.
    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether this is a sweep table (rows carry thresholds).
    pub fn is_sweep(&self) -> bool {
        self.sweep
    }

    /// Cell value; NaN for undefined metrics, `None` for unknown columns.
    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let row = self.rows.get(row)?;
        if let Some(v) = row.record.value(column) {
            return Some(v);
        }
        let band = self.bands.iter().position(|b| b == column)?;
        Some(row.record.uncertain_value(band))
    }

    /// Row whose labels (and threshold, for sweeps) match.
    pub fn find(&self, labels: &[&str], threshold: Option<Threshold>) -> Option<&MetricRow> {
        self.rows.iter().find(|r| {
            r.threshold == threshold
                && r.labels.len() == labels.len()
                && r.labels.iter().zip(labels).all(|(a, b)| a == b)
        })
    }

    /// Same rows, different displayed columns. Unknown names are dropped
    /// with a warning.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Self {
        let mut kept = Vec::with_capacity(columns.len());
        for column in columns.iter().map(AsRef::as_ref) {
            if self.is_column(column) {
                kept.push(column.to_string());
            } else {
                log::warn!("Unknown metric column {column:?} ignored");
            }
        }
        Self {
            columns: kept,
            ..self.clone()
        }
    }

    fn is_column(&self, column: &str) -> bool {
        DEFAULT_TABLE_COLUMNS.contains(&column) || self.bands.iter().any(|b| b == column)
    }

    /// Rows as JSON records keyed by index and column names. NaN becomes null.
    pub fn to_records(&self) -> Vec<Map<String, Json>> {
        (0..self.rows.len())
            .map(|i| {
                let row = &self.rows[i];
                let mut record = Map::new();
                for (name, label) in self.strata.iter().zip(&row.labels) {
                    record.insert(name.clone(), Json::String(label.clone()));
                }
                if let Some(t) = row.threshold {
                    record.insert(THRESHOLD_INDEX.to_string(), number(t.get()));
                }
                for column in &self.columns {
                    let v = self.value(i, column).unwrap_or(f64::NAN);
                    record.insert(column.clone(), number(v));
                }
                record
            })
            .collect()
    }

    /// Serialize to a JSON array of records.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn number(v: f64) -> Json {
    Number::from_f64(v).map_or(Json::Null, Json::Number)
}

impl Serialize for MetricTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_records())
    }
}

// =============================================================================
// Display
// =============================================================================

fn cell(v: f64, count: bool) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if count {
        format!("{v:.0}")
    } else {
        format!("{v:.3}")
    }
}

impl fmt::Display for MetricTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.index_names();
        let mut grid: Vec<Vec<String>> = Vec::with_capacity(self.rows.len() + 1);
        grid.push(index.iter().chain(&self.columns).cloned().collect());
        for (i, row) in self.rows.iter().enumerate() {
            let mut line = row.labels.clone();
            if let Some(t) = row.threshold {
                line.push(t.to_string());
            }
            for column in &self.columns {
                let count = COUNT_COLUMNS.contains(&column.as_str()) || self.bands.contains(column);
                line.push(cell(self.value(i, column).unwrap_or(f64::NAN), count));
            }
            grid.push(line);
        }

        let width = grid[0].len();
        let widths: Vec<usize> = (0..width)
            .map(|c| {
                grid.iter()
                    .filter_map(|l| l.get(c))
                    .map(|s| s.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let rule = "-".repeat(widths.iter().sum::<usize>() + 2 * width.saturating_sub(1));

        for (n, line) in grid.iter().enumerate() {
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(c, (s, &w))| {
                    if c < index.len() {
                        format!("{s:<w$}")
                    } else {
                        format!("{s:>w$}")
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join("  ").trim_end())?;
            if n == 0 {
                writeln!(f, "{rule}")?;
            }
        }
        Ok(())
    }
}
