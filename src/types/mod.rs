//! Witness types that encode evaluation invariants.
//!
//! Parse once, rely on the invariant downstream: a [`Threshold`] is always in
//! [0, 1] and always carries at most 3 decimals, so the thresholder, the sweep
//! deduplication and the output table never re-check it.

mod threshold;

pub use threshold::{round3, Threshold, ThresholdError, THRESHOLD_DECIMALS};
