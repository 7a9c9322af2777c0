//! Evaluation configuration.
//!
//! Both call shapes take a config struct that deserializes from JSON with
//! every field optional:
//!
//! ```rust
//! use strateval::config::SweepConfig;
//!
//! let config: SweepConfig = serde_json::from_str(r#"{
//!     "strata": ["site"],
//!     "custom_thresholds": [0.35, 0.5]
//! }"#).unwrap();
//! assert_eq!(config.common.strata, vec!["site"]);
//! assert!(!config.show_only_custom);
//! ```
//!
//! or is assembled with a builder:
//!
//! ```rust
//! use strateval::config::SingleConfig;
//!
//! let config = SingleConfig::builder()
//!     .with_threshold(0.3)
//!     .with_strata(["site", "scanner"])
//!     .with_limit(10)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.limit, Some(10));
//! ```

use crate::eval::report::DEFAULT_TABLE_COLUMNS;
use crate::eval::resolver::LinearRange;
use crate::eval::thresholder::{ThresholdSpec, UncertaintyBand};
use crate::preprocess::NullPolicy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default lenient thresholds for Far FN / Far FP.
pub const DEFAULT_FAR_THRESHOLDS: (f64, f64) = (0.1, 0.9);

/// What to do when two groups render to the same output labels.
///
/// Distinct typed stratum values can collide once rendered (`1` and `"1"`),
/// and exploded list cells can yield repeated rows. `Max` keeps the
/// column-wise maximum of the colliding records; `Reject` fails the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Column-wise maximum, ignoring undefined values.
    #[default]
    Max,
    /// Fail with [`Error::DuplicateGroup`].
    Reject,
}

// =============================================================================
// Shared Options
// =============================================================================

/// Options shared by single and sweep evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Stratum columns. Empty means one implicit `Data = All` group.
    pub strata: Vec<String>,
    /// Explode list-valued stratum cells into one row per element.
    pub unpack_strata: bool,
    /// Lenient `(low, high)` thresholds for severe misses and false alarms.
    pub far_thresholds: (f64, f64),
    /// Output columns, in order.
    pub columns: Vec<String>,
    /// Null filtering over ground truth, score and strata.
    pub null_policy: NullPolicy,
    /// Reducer for colliding groups.
    pub duplicates: DuplicatePolicy,
    /// Free-text description of the ground truth, for the log header.
    pub gt_description: Option<String>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            strata: Vec::new(),
            unpack_strata: false,
            far_thresholds: DEFAULT_FAR_THRESHOLDS,
            columns: DEFAULT_TABLE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            null_policy: NullPolicy::default(),
            duplicates: DuplicatePolicy::default(),
            gt_description: None,
        }
    }
}

impl EvalConfig {
    /// Check far thresholds lie in [0, 1].
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = self.far_thresholds;
        for t in [lo, hi] {
            if !(0.0..=1.0).contains(&t) {
                return Err(Error::invalid_threshold(format!(
                    "Far threshold must be between 0 and 1. Threshold used: {t}"
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Single Threshold
// =============================================================================

/// Configuration for [`evaluate_single`](crate::eval::evaluate_single).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleConfig {
    /// Shared options.
    #[serde(flatten)]
    pub common: EvalConfig,
    /// Global or per-subset thresholds.
    pub threshold: ThresholdSpec,
    /// Fail when a scored row is left without a prediction.
    pub strict: bool,
    /// Score bands counted as uncertain.
    pub uncertainty_ranges: Vec<UncertaintyBand>,
    /// Keep only the largest groups by row count.
    pub limit: Option<usize>,
}

impl Default for SingleConfig {
    fn default() -> Self {
        Self {
            common: EvalConfig::default(),
            threshold: ThresholdSpec::default(),
            strict: true,
            uncertainty_ranges: vec![UncertaintyBand::new(0.4, 0.6)],
            limit: None,
        }
    }
}

impl SingleConfig {
    /// Start a builder from the defaults.
    pub fn builder() -> SingleConfigBuilder {
        SingleConfigBuilder::default()
    }

    /// Check thresholds are valid.
    pub fn validate(&self) -> Result<()> {
        self.common.validate()?;
        self.threshold.validate()
    }
}

/// Builder for [`SingleConfig`].
#[derive(Debug, Clone, Default)]
pub struct SingleConfigBuilder {
    config: SingleConfig,
}

impl SingleConfigBuilder {
    /// Use one global threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = ThresholdSpec::global(threshold);
        self
    }

    /// Use a full threshold spec.
    pub fn with_threshold_spec(mut self, spec: ThresholdSpec) -> Self {
        self.config.threshold = spec;
        self
    }

    /// Set stratum columns.
    pub fn with_strata<I, S>(mut self, strata: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.common.strata = strata.into_iter().map(Into::into).collect();
        self
    }

    /// Explode list-valued stratum cells.
    pub fn unpack_strata(mut self, unpack: bool) -> Self {
        self.config.common.unpack_strata = unpack;
        self
    }

    /// Set far thresholds.
    pub fn with_far_thresholds(mut self, low: f64, high: f64) -> Self {
        self.config.common.far_thresholds = (low, high);
        self
    }

    /// Replace uncertainty bands.
    pub fn with_uncertainty_ranges<I: IntoIterator<Item = (f64, f64)>>(mut self, bands: I) -> Self {
        self.config.uncertainty_ranges = bands.into_iter().map(UncertaintyBand::from).collect();
        self
    }

    /// Set output columns.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.common.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Keep only the `limit` largest groups.
    ///
    /// A `limit` of 0 means unlimited.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.config.limit = (limit > 0).then_some(limit);
        self
    }

    /// Toggle strict thresholding.
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// Set null policy.
    pub fn with_null_policy(mut self, policy: NullPolicy) -> Self {
        self.config.common.null_policy = policy;
        self
    }

    /// Set duplicate-group policy.
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.config.common.duplicates = policy;
        self
    }

    /// Describe the ground truth.
    pub fn with_gt_description(mut self, description: impl Into<String>) -> Self {
        self.config.common.gt_description = Some(description.into());
        self
    }

    /// Validate and return the config.
    pub fn build(self) -> Result<SingleConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// =============================================================================
// Threshold Sweep
// =============================================================================

/// Configuration for [`evaluate_sweep`](crate::eval::evaluate_sweep).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Shared options.
    #[serde(flatten)]
    pub common: EvalConfig,
    /// Linear sweep of thresholds.
    pub thresholds_range: LinearRange,
    /// Target sensitivities resolved on each group's ROC curve.
    pub target_sensitivities: LinearRange,
    /// Target specificities resolved on each group's ROC curve.
    pub target_specificities: LinearRange,
    /// Thresholds always evaluated.
    pub custom_thresholds: Vec<f64>,
    /// Evaluate only `custom_thresholds`.
    pub show_only_custom: bool,
    /// Score bands counted as uncertain.
    pub uncertainty_ranges: Vec<UncertaintyBand>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            common: EvalConfig::default(),
            thresholds_range: LinearRange::new(0.4, 0.6 + 1e-5, 0.05),
            target_sensitivities: LinearRange::new(0.7, 1.0 - 1e-5, 0.05),
            target_specificities: LinearRange::new(0.7, 1.0 - 1e-5, 0.05),
            custom_thresholds: Vec::new(),
            show_only_custom: false,
            uncertainty_ranges: Vec::new(),
        }
    }
}

impl SweepConfig {
    /// Start a builder from the defaults.
    pub fn builder() -> SweepConfigBuilder {
        SweepConfigBuilder::default()
    }

    /// Percent-grid preset: thresholds `0.00, 0.01, ..., 1.00` only, with
    /// the confusion counts plus Sen and Spec.
    pub fn pm_mode() -> Self {
        Self {
            common: EvalConfig {
                columns: ["TP", "FN", "FP", "TN", "Sen", "Spec"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
                ..EvalConfig::default()
            },
            custom_thresholds: (0..=100).map(|i| f64::from(i) / 100.0).collect(),
            show_only_custom: true,
            ..Self::default()
        }
    }

    /// Check far thresholds and range steps, and that a custom-only sweep
    /// has thresholds to evaluate.
    pub fn validate(&self) -> Result<()> {
        self.common.validate()?;
        if self.show_only_custom && self.custom_thresholds.is_empty() {
            return Err(Error::invalid_input(
                "show_only_custom requires at least one custom threshold",
            ));
        }
        if !self.show_only_custom {
            self.thresholds_range.values()?;
            self.target_sensitivities.values()?;
            self.target_specificities.values()?;
        }
        Ok(())
    }
}

/// Builder for [`SweepConfig`].
#[derive(Debug, Clone, Default)]
pub struct SweepConfigBuilder {
    config: SweepConfig,
}

impl SweepConfigBuilder {
    /// Start from the percent-grid preset.
    pub fn pm_mode() -> Self {
        Self {
            config: SweepConfig::pm_mode(),
        }
    }

    /// Set stratum columns.
    pub fn with_strata<I, S>(mut self, strata: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.common.strata = strata.into_iter().map(Into::into).collect();
        self
    }

    /// Explode list-valued stratum cells.
    pub fn unpack_strata(mut self, unpack: bool) -> Self {
        self.config.common.unpack_strata = unpack;
        self
    }

    /// Set the linear sweep.
    pub fn with_thresholds_range(mut self, start: f64, stop: f64, step: f64) -> Self {
        self.config.thresholds_range = LinearRange::new(start, stop, step);
        self
    }

    /// Set sensitivity targets.
    pub fn with_target_sensitivities(mut self, start: f64, stop: f64, step: f64) -> Self {
        self.config.target_sensitivities = LinearRange::new(start, stop, step);
        self
    }

    /// Set specificity targets.
    pub fn with_target_specificities(mut self, start: f64, stop: f64, step: f64) -> Self {
        self.config.target_specificities = LinearRange::new(start, stop, step);
        self
    }

    /// Set custom thresholds.
    pub fn with_custom_thresholds<I: IntoIterator<Item = f64>>(mut self, thresholds: I) -> Self {
        self.config.custom_thresholds = thresholds.into_iter().collect();
        self
    }

    /// Evaluate only custom thresholds.
    pub fn show_only_custom(mut self, only: bool) -> Self {
        self.config.show_only_custom = only;
        self
    }

    /// Set far thresholds.
    pub fn with_far_thresholds(mut self, low: f64, high: f64) -> Self {
        self.config.common.far_thresholds = (low, high);
        self
    }

    /// Replace uncertainty bands.
    pub fn with_uncertainty_ranges<I: IntoIterator<Item = (f64, f64)>>(mut self, bands: I) -> Self {
        self.config.uncertainty_ranges = bands.into_iter().map(UncertaintyBand::from).collect();
        self
    }

    /// Set output columns.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.common.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set null policy.
    pub fn with_null_policy(mut self, policy: NullPolicy) -> Self {
        self.config.common.null_policy = policy;
        self
    }

    /// Set duplicate-group policy.
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.config.common.duplicates = policy;
        self
    }

    /// Describe the ground truth.
    pub fn with_gt_description(mut self, description: impl Into<String>) -> Self {
        self.config.common.gt_description = Some(description.into());
        self
    }

    /// Validate and return the config.
    pub fn build(self) -> Result<SweepConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
