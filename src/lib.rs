//! # strateval
//!
//! Stratified threshold evaluation for binary classifiers.
//!
//! - **Thresholds**: global or per-subset, first match wins
//! - **Sweeps**: linear ranges, sensitivity/specificity targets, Youden crossover
//! - **Metrics**: confusion counts, Sen/Spec with Wilson CIs, AUC with DeLong CIs
//! - **Strata**: one row per group, optionally exploding list-valued cells
//!
//! ## Quick Start
//!
//! ```rust
//! use strateval::prelude::*;
//!
//! let table = Table::from_json_records(r#"[
//!     {"GT": 1, "Score": 0.9, "site": "A"}, {"GT": 1, "Score": 0.4, "site": "A"},
//!     {"GT": 0, "Score": 0.3, "site": "B"}, {"GT": 0, "Score": 0.2, "site": "B"}
//! ]"#)?;
//!
//! let config = SingleConfig::builder().with_strata(["site"]).build()?;
//! if let EvalOutcome::Evaluated(metrics) = evaluate_single(&table, "GT", "Score", &config)? {
//!     println!("{metrics}");
//!     assert_eq!(metrics.len(), 2);
//! }
//! # Ok::<(), strateval::Error>(())
//! ```
//!
//! ## Undefined Values
//!
//! | Situation | Reported as |
//! |-----------|-------------|
//! | Zero denominator (PPV with PP = 0, ...) | NaN |
//! | ≤ 5 distinct scores in a group | AUC, Far FN/FP, band counts NaN |
//! | Interval not estimable | point estimate, NaN bounds |
//! | Missing columns, no rows | [`EvalOutcome::NoData`] |
//!
//! ## Design
//!
//! - **Pure**: no I/O, no shared state; concurrent calls on separate tables are independent
//! - **Explicit fallbacks**: interval failures are an `Option`, not a caught error
//! - **Logging**: through the `log` facade; install any logger to see it

#![warn(missing_docs)]

pub mod config;
mod error;
pub mod eval;
pub mod preprocess;
pub mod table;
pub mod types;

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use strateval::prelude::*;
    //!
    //! let config = SweepConfig::pm_mode();
    //! assert!(config.show_only_custom);
    //! ```
    pub use crate::config::{DuplicatePolicy, EvalConfig, SingleConfig, SweepConfig};
    pub use crate::error::{Error, Result};
    pub use crate::eval::{
        evaluate_single, evaluate_sweep, EvalOutcome, MetricTable, NoDataReason, ThresholdRule,
        ThresholdSpec,
    };
    pub use crate::preprocess::NullPolicy;
    pub use crate::table::{Table, Value};
    pub use crate::types::Threshold;
}

// Re-exports
pub use config::{DuplicatePolicy, EvalConfig, SingleConfig, SweepConfig};
pub use error::{Error, Result};
pub use eval::{evaluate_single, evaluate_sweep, EvalOutcome, MetricTable, NoDataReason};
pub use table::{Table, Value};
pub use types::Threshold;
