//! Stratified threshold evaluation.
//!
//! # Overview
//!
//! Binary classifier output (ground-truth label plus continuous score per
//! row) is evaluated at one or more decision thresholds, separately for
//! every stratum of the data:
//!
//! - **Single**: one threshold spec (global or per subset) per call
//! - **Sweep**: custom, linear, and ROC-derived thresholds per stratum
//!
//! ```rust
//! use strateval::config::SweepConfig;
//! use strateval::eval::{evaluate_sweep, EvalOutcome};
//! use strateval::table::Table;
//!
//! let table = Table::from_json_records(r#"[
//!     {"GT": 1, "Score": 0.95, "site": "A"}, {"GT": 0, "Score": 0.15, "site": "A"},
//!     {"GT": 1, "Score": 0.65, "site": "A"}, {"GT": 0, "Score": 0.45, "site": "A"}
//! ]"#).unwrap();
//!
//! let config = SweepConfig::builder()
//!     .with_strata(["site"])
//!     .with_custom_thresholds([0.3, 0.7])
//!     .show_only_custom(true)
//!     .build()
//!     .unwrap();
//!
//! match evaluate_sweep(&table, "GT", "Score", &config).unwrap() {
//!     EvalOutcome::Evaluated(metrics) => assert_eq!(metrics.len(), 2),
//!     EvalOutcome::NoData(reason) => panic!("{reason}"),
//! }
//! ```
//!
//! # Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Null filtering, coercion | [`crate::preprocess`] |
//! | ROC curve, rank AUC | [`roc`] |
//! | Operating-point thresholds | [`resolver`] |
//! | Score → prediction | [`thresholder`] |
//! | Confusion metrics, CIs | [`metrics`], [`confidence`] |
//! | Grouping, sorting | [`stratified`] |
//! | Output table | [`report`] |

pub mod confidence;
pub mod metrics;
pub mod report;
pub mod resolver;
pub mod roc;
pub mod stratified;
pub mod thresholder;

pub use confidence::{Estimate, Interval, Z_95};
pub use metrics::{aggregate, ConfusionCounts, MetricRecord, DEFAULT_TABLE_COLUMNS};
pub use report::{EvalOutcome, MetricRow, MetricTable, NoDataReason, NO_DATA_MESSAGE};
pub use resolver::{
    resolve_by_operating_point, resolve_youden, Axis, LinearRange, ThresholdSet,
};
pub use roc::{RocCurve, RocPoint};
pub use stratified::{evaluate_single, evaluate_sweep};
pub use thresholder::{apply_threshold, ThresholdRule, ThresholdSpec, UncertaintyBand};
