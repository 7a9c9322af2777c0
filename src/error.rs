//! Error types for strateval.

use thiserror::Error;

/// Result type for strateval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for strateval operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Required columns are absent from the source table.
    #[error("Missing columns: {0:?}")]
    MissingColumns(Vec<String>),

    /// A threshold is outside [0, 1] or the threshold spec is malformed.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Strict thresholding left scored rows without a prediction.
    #[error(
        "Strict thresholding failed for {unresolved} row(s). \
         Provide a default threshold for foolproof usage."
    )]
    UnresolvedThreshold {
        /// Rows with a score but no applicable threshold.
        unresolved: usize,
    },

    /// The ROC curve is degenerate because only one class is present.
    #[error("Insufficient class diversity: {positives} positive(s), {negatives} negative(s)")]
    InsufficientClassDiversity {
        /// Positive samples seen.
        positives: usize,
        /// Negative samples seen.
        negatives: usize,
    },

    /// An interval estimator could not produce bounds.
    #[error("Confidence interval estimation failed: {0}")]
    ConfidenceInterval(String),

    /// No curve point reaches the requested operating point.
    #[error("No operating point reaches target {target}")]
    UnreachableTarget {
        /// The requested sensitivity/specificity.
        target: f64,
    },

    /// A cell could not be coerced to the type its column requires.
    #[error("Cannot coerce {value} in column '{column}'")]
    Coercion {
        /// Column name.
        column: String,
        /// Rendered offending value.
        value: String,
    },

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Two groups rendered to the same index label under `DuplicatePolicy::Reject`.
    #[error("Duplicate group: {0}")]
    DuplicateGroup(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid threshold error.
    pub fn invalid_threshold(msg: impl Into<String>) -> Self {
        Error::InvalidThreshold(msg.into())
    }

    /// Create a confidence interval error.
    pub fn confidence_interval(msg: impl Into<String>) -> Self {
        Error::ConfidenceInterval(msg.into())
    }

    /// Create a coercion error.
    pub fn coercion(column: impl Into<String>, value: impl ToString) -> Self {
        Error::Coercion {
            column: column.into(),
            value: value.to_string(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a duplicate group error.
    pub fn duplicate_group(msg: impl Into<String>) -> Self {
        Error::DuplicateGroup(msg.into())
    }

    /// Whether this error is confined to a single stratum or threshold.
    ///
    /// Local errors are logged and skipped by the grouping engine instead of
    /// aborting the whole evaluation.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::InsufficientClassDiversity { .. }
                | Error::ConfidenceInterval(_)
                | Error::UnreachableTarget { .. }
        )
    }
}
