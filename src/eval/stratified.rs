//! Stratified evaluation: group rows by stratum values, then threshold and
//! aggregate each group.
//!
//! ```text
//!   Table ──preprocess──► Frame ──explode?──► groups by (s1, s2, ...)
//!                                                │
//!        single:  1 threshold spec ──► 1 record per group
//!        sweep:   custom ∪ range ∪ Sen/Spec targets ∪ Youden
//!                 (rounded, deduplicated per group) ──► 1 record per (group, t)
//!                                                │
//!                              sorted by labels (then threshold) ──► MetricTable
//! ```
//!
//! Groups are keyed by their typed stratum values and labelled by rendering
//! those values. When distinct keys render to the same labels, the
//! configured [`DuplicatePolicy`] decides.
//!
//! Failures local to one group (one class only, an unreachable target,
//! an unavailable interval) are logged and skipped. Missing columns and
//! empty input yield [`EvalOutcome::NoData`]. Invalid or unresolved
//! thresholds are returned as errors.

use super::metrics::{aggregate, MetricRecord};
use super::report::{EvalOutcome, MetricRow, MetricTable, NoDataReason};
use super::resolver::{threshold_on_curve, youden_on_curve, Axis, ThresholdSet};
use super::roc::RocCurve;
use super::thresholder::{apply_threshold, predict, UncertaintyBand};
use crate::config::{DuplicatePolicy, EvalConfig, SingleConfig, SweepConfig};
use crate::preprocess::{preprocess, Frame};
use crate::table::{Table, Value};
use crate::types::Threshold;
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Stratum column used when none is configured.
pub const IMPLICIT_STRATUM: &str = "Data";

/// Label of the implicit stratum's single group.
pub const IMPLICIT_GROUP: &str = "All";

// =============================================================================
// Grouping
// =============================================================================

/// Rows sharing one typed stratum key.
#[derive(Debug, Clone)]
struct Group {
    key: Vec<Value>,
    rows: Vec<usize>,
}

fn same_key(a: &[Value], b: &[Value]) -> bool {
    a.iter()
        .zip(b)
        .all(|(x, y)| x == y || (x.is_null() && y.is_null()))
}

/// Partition rows by stratum values, bucketed by rendered labels.
///
/// The map orders buckets lexicographically by label tuple; each bucket
/// usually holds exactly one group.
fn group_rows(frame: &Frame, strata: &[String]) -> Result<BTreeMap<Vec<String>, Vec<Group>>> {
    let cols = strata
        .iter()
        .map(|s| {
            frame
                .column_index(s)
                .ok_or_else(|| Error::MissingColumns(vec![s.clone()]))
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut buckets: BTreeMap<Vec<String>, Vec<Group>> = BTreeMap::new();
    for row in 0..frame.len() {
        let key: Vec<Value> = cols.iter().map(|&c| frame.value(row, c).clone()).collect();
        let labels: Vec<String> = key.iter().map(Value::label).collect();
        let bucket = buckets.entry(labels).or_default();
        match bucket.iter_mut().find(|g| same_key(&g.key, &key)) {
            Some(group) => group.rows.push(row),
            None => bucket.push(Group {
                key,
                rows: vec![row],
            }),
        }
    }
    Ok(buckets)
}

/// Reduce the records of groups sharing one label tuple.
fn reduce(labels: &[String], records: Vec<MetricRecord>, policy: DuplicatePolicy) -> Result<Option<MetricRecord>> {
    if records.len() > 1 {
        match policy {
            DuplicatePolicy::Reject => {
                return Err(Error::duplicate_group(format!(
                    "{} groups render as {labels:?}",
                    records.len()
                )))
            }
            DuplicatePolicy::Max => {
                log::warn!(
                    "{} groups render as {labels:?}; keeping column-wise maximum",
                    records.len()
                );
            }
        }
    }
    Ok(records.into_iter().reduce(|a, b| a.merge_max(&b)))
}

// =============================================================================
// Shared Preparation
// =============================================================================

/// Preprocessed, stratified input ready for thresholding.
struct Prepared {
    frame: Frame,
    strata: Vec<String>,
}

/// Preprocess, add the implicit stratum, and explode list cells.
///
/// `Ok(Err(reason))` is the no-data sentinel.
fn prepare(
    table: &Table,
    gt_col: &str,
    score_col: &str,
    common: &EvalConfig,
    extra: &[String],
) -> Result<std::result::Result<Prepared, NoDataReason>> {
    let implicit = common.strata.is_empty();
    let mut required = vec![gt_col.to_string(), score_col.to_string()];
    required.extend(common.strata.iter().cloned());
    let frame = match preprocess(table, &required, extra, common.null_policy) {
        Ok(frame) => frame,
        Err(Error::MissingColumns(missing)) => {
            log::warn!("Missing columns: {missing:?}");
            return Ok(Err(NoDataReason::MissingColumns(missing)));
        }
        Err(e) => return Err(e),
    };

    let strata = if implicit {
        vec![IMPLICIT_STRATUM.to_string()]
    } else {
        common.strata.clone()
    };
    if frame.is_empty() {
        log::warn!("{} ({strata:?})", super::report::NO_DATA_MESSAGE);
        return Ok(Err(NoDataReason::Empty { strata }));
    }

    let mut frame = if implicit {
        let all = vec![Value::from(IMPLICIT_GROUP); frame.len()];
        frame.with_column(IMPLICIT_STRATUM, all)?
    } else {
        frame
    };
    if common.unpack_strata {
        for stratum in &strata {
            frame = frame.explode(stratum)?;
        }
        if frame.is_empty() {
            log::warn!("No rows left after unpacking {strata:?}");
            return Ok(Err(NoDataReason::Empty { strata }));
        }
    }
    Ok(Ok(Prepared { frame, strata }))
}

fn output_columns(common: &EvalConfig, bands: &[UncertaintyBand]) -> (Vec<String>, Vec<String>) {
    let labels: Vec<String> = bands.iter().map(UncertaintyBand::label).collect();
    let mut columns = common.columns.clone();
    for label in &labels {
        if !columns.contains(label) {
            columns.push(label.clone());
        }
    }
    (columns, labels)
}

fn log_header(gt_col: &str, score_col: &str, common: &EvalConfig) {
    let description = common.gt_description.as_deref().unwrap_or("No description");
    log::info!("GT: {gt_col} ({description})");
    log::info!("Score: {score_col}");
    log::info!("Far thresholds: {:?}", common.far_thresholds);
}

/// Predictions at the lenient far thresholds.
fn far_predictions(scores: &[Option<f64>], common: &EvalConfig) -> (Vec<Option<bool>>, Vec<Option<bool>>) {
    let (lo, hi) = common.far_thresholds;
    (predict(scores, lo), predict(scores, hi))
}

fn pick<T: Clone>(values: &[T], rows: &[usize]) -> Vec<T> {
    rows.iter().map(|&i| values[i].clone()).collect()
}

// =============================================================================
// Single Threshold
// =============================================================================

/// Evaluate every group at one threshold spec.
///
/// One row per group, sorted by stratum labels. With `limit`, only the
/// groups with the most rows are kept.
///
/// # Errors
///
/// [`Error::InvalidThreshold`] and [`Error::UnresolvedThreshold`] from the
/// thresholder, [`Error::Coercion`] for unparseable labels or scores, and
/// [`Error::DuplicateGroup`] under [`DuplicatePolicy::Reject`].
///
/// # Example
///
/// ```rust
/// use strateval::config::SingleConfig;
/// use strateval::eval::evaluate_single;
/// use strateval::table::Table;
///
/// let table = Table::from_json_records(r#"[
///     {"GT": 1, "Score": 0.9}, {"GT": 1, "Score": 0.4},
///     {"GT": 0, "Score": 0.3}, {"GT": 0, "Score": 0.2}
/// ]"#).unwrap();
///
/// let outcome = evaluate_single(&table, "GT", "Score", &SingleConfig::default()).unwrap();
/// let metrics = outcome.table().unwrap();
/// assert_eq!(metrics.value(0, "Sen"), Some(0.5));
/// assert_eq!(metrics.value(0, "Spec"), Some(1.0));
/// ```
pub fn evaluate_single(table: &Table, gt_col: &str, score_col: &str, config: &SingleConfig) -> Result<EvalOutcome> {
    config.validate()?;
    let common = &config.common;
    log_header(gt_col, score_col, common);
    log::info!("Threshold: {:?}", config.threshold);

    let Prepared { frame, strata } =
        match prepare(table, gt_col, score_col, common, &config.threshold.subset_columns())? {
            Ok(prepared) => prepared,
            Err(reason) => return Ok(EvalOutcome::NoData(reason)),
        };

    let pred = apply_threshold(&frame, &config.threshold, config.strict)?;
    let (far_fn, far_fp) = far_predictions(frame.scores(), common);
    let bands: Vec<Vec<bool>> = config
        .uncertainty_ranges
        .iter()
        .map(|b| b.flags(frame.scores()))
        .collect();

    let mut rows = Vec::new();
    for (labels, groups) in group_rows(&frame, &strata)? {
        let records = groups
            .iter()
            .map(|g| {
                log::debug!("group {labels:?}: {} rows", g.rows.len());
                let bands: Vec<Vec<bool>> = bands.iter().map(|f| pick(f, &g.rows)).collect();
                aggregate(
                    &pick(frame.gt(), &g.rows),
                    &pick(frame.scores(), &g.rows),
                    &pick(&pred, &g.rows),
                    &pick(&far_fn, &g.rows),
                    &pick(&far_fp, &g.rows),
                    &bands,
                )
            })
            .collect();
        if let Some(record) = reduce(&labels, records, common.duplicates)? {
            rows.push(MetricRow {
                labels,
                threshold: None,
                record,
            });
        }
    }

    if let Some(limit) = config.limit {
        // Stable: equal totals keep label order.
        rows.sort_by(|a, b| b.record.counts.total.cmp(&a.record.counts.total));
        rows.truncate(limit);
        rows.sort_by(|a, b| a.labels.cmp(&b.labels));
    }

    let (columns, band_labels) = output_columns(common, &config.uncertainty_ranges);
    let table = MetricTable::new(strata, Vec::new(), band_labels, rows).select(&columns);
    Ok(EvalOutcome::Evaluated(table))
}

// =============================================================================
// Threshold Sweep
// =============================================================================

/// Candidate thresholds for one group, deduplicated after rounding.
///
/// Operating-point candidates are resolved on the group's ROC curve; when
/// that curve is degenerate they are skipped and the rest are kept.
pub fn sweep_candidates(gt: &[bool], scores: &[Option<f64>], config: &SweepConfig) -> Result<ThresholdSet> {
    let mut set: ThresholdSet = config.custom_thresholds.iter().copied().collect();
    if config.show_only_custom {
        return Ok(set);
    }
    set.extend(config.thresholds_range.values()?);

    let (labels, values): (Vec<bool>, Vec<f64>) = gt
        .iter()
        .zip(scores)
        .filter_map(|(&g, s)| s.map(|s| (g, s)))
        .unzip();
    if values.is_empty() {
        return Ok(set);
    }
    let curve = match RocCurve::compute(&labels, &values) {
        Ok(curve) => curve,
        Err(e) if e.is_local() => {
            log::warn!("Skipping operating-point thresholds: {e}");
            return Ok(set);
        }
        Err(e) => return Err(e),
    };

    let targets = [
        (Axis::Sensitivity, config.target_sensitivities.values()?),
        (Axis::Specificity, config.target_specificities.values()?),
    ];
    for (axis, targets) in targets {
        for target in targets {
            match threshold_on_curve(&curve, target, axis) {
                Ok(t) => {
                    set.insert_threshold(t);
                }
                Err(e) if e.is_local() => log::debug!("{axis:?} target {target}: {e}"),
                Err(e) => return Err(e),
            }
        }
    }
    match youden_on_curve(&curve) {
        Ok(t) => {
            set.insert_threshold(t);
        }
        Err(e) if e.is_local() => log::debug!("Youden threshold: {e}"),
        Err(e) => return Err(e),
    }
    Ok(set)
}

/// Evaluate every group at every candidate threshold.
///
/// One row per (group, threshold), sorted by stratum labels then by
/// threshold ascending. Groups with a degenerate ROC curve are still
/// evaluated at the custom and linear thresholds.
///
/// # Errors
///
/// [`Error::InvalidInput`] for a non-positive range step,
/// [`Error::Coercion`] for unparseable labels or scores, and
/// [`Error::DuplicateGroup`] under [`DuplicatePolicy::Reject`].
pub fn evaluate_sweep(table: &Table, gt_col: &str, score_col: &str, config: &SweepConfig) -> Result<EvalOutcome> {
    config.validate()?;
    let common = &config.common;
    log_header(gt_col, score_col, common);

    let Prepared { frame, strata } = match prepare(table, gt_col, score_col, common, &[])? {
        Ok(prepared) => prepared,
        Err(reason) => return Ok(EvalOutcome::NoData(reason)),
    };

    let mut rows = Vec::new();
    for (labels, groups) in group_rows(&frame, &strata)? {
        let mut by_threshold: BTreeMap<Threshold, Vec<MetricRecord>> = BTreeMap::new();
        for group in &groups {
            let sub = frame.select(&group.rows);
            let thresholds = sweep_candidates(sub.gt(), sub.scores(), config)?;
            log::debug!(
                "group {labels:?}: {} rows, {} thresholds",
                sub.len(),
                thresholds.len()
            );

            let (far_fn, far_fp) = far_predictions(sub.scores(), common);
            let bands: Vec<Vec<bool>> = config
                .uncertainty_ranges
                .iter()
                .map(|b| b.flags(sub.scores()))
                .collect();
            for t in thresholds.iter() {
                let pred: Vec<Option<bool>> = sub
                    .scores()
                    .iter()
                    .map(|s| s.map(|s| t.predicts(s)))
                    .collect();
                let record = aggregate(sub.gt(), sub.scores(), &pred, &far_fn, &far_fp, &bands);
                by_threshold.entry(t).or_default().push(record);
            }
        }
        for (t, records) in by_threshold {
            if let Some(record) = reduce(&labels, records, common.duplicates)? {
                rows.push(MetricRow {
                    labels: labels.clone(),
                    threshold: Some(t),
                    record,
                });
            }
        }
    }

    let (columns, band_labels) = output_columns(common, &config.uncertainty_ranges);
    let table = MetricTable::sweep(strata, Vec::new(), band_labels, rows).select(&columns);
    Ok(EvalOutcome::Evaluated(table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::thresholder::{ThresholdRule, ThresholdSpec};

    fn table(json: &str) -> Table {
        Table::from_json_records(json).unwrap()
    }

    fn basic() -> Table {
        table(
            r#"[
            {"GT": 1, "Score": 0.9, "site": "B"},
            {"GT": 1, "Score": 0.4, "site": "B"},
            {"GT": 0, "Score": 0.3, "site": "A"},
            {"GT": 0, "Score": 0.2, "site": "A"},
            {"GT": 1, "Score": 0.7, "site": "A"},
            {"GT": 0, "Score": 0.6, "site": "B"}
        ]"#,
        )
    }

    #[test]
    fn implicit_stratum() {
        let outcome = evaluate_single(&basic(), "GT", "Score", &SingleConfig::default()).unwrap();
        let t = outcome.table().unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.strata(), [IMPLICIT_STRATUM]);
        assert_eq!(t.rows()[0].labels, vec![IMPLICIT_GROUP]);
        assert_eq!(t.value(0, "Total"), Some(6.0));
        // Single-mode band column is appended.
        assert!(t.columns().iter().any(|c| c == "[0.4, 0.6)"));
    }

    #[test]
    fn strata_sorted_by_label() {
        let config = SingleConfig::builder().with_strata(["site"]).build().unwrap();
        let t = evaluate_single(&basic(), "GT", "Score", &config)
            .unwrap()
            .into_table()
            .unwrap();
        let labels: Vec<&str> = t.rows().iter().map(|r| r.labels[0].as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(t.value(0, "TP"), Some(1.0));
        assert_eq!(t.value(1, "FP"), Some(1.0));
    }

    #[test]
    fn missing_columns_are_a_sentinel() {
        let config = SingleConfig::builder().with_strata(["nope"]).build().unwrap();
        let outcome = evaluate_single(&basic(), "GT", "Score", &config).unwrap();
        assert_eq!(
            outcome,
            EvalOutcome::NoData(NoDataReason::MissingColumns(vec!["nope".into()]))
        );
    }

    #[test]
    fn missing_threshold_discriminator_is_a_sentinel() {
        let spec = ThresholdSpec::from_rules(vec![
            ThresholdRule::subset("scanner", [("X", 0.3)]),
            ThresholdRule::Global(0.5),
        ]);
        let config = SingleConfig::builder().with_threshold_spec(spec).build().unwrap();
        let outcome = evaluate_single(&basic(), "GT", "Score", &config).unwrap();
        assert!(outcome.is_no_data());
    }

    #[test]
    fn per_subset_thresholds() {
        let spec = ThresholdSpec::from_rules(vec![
            ThresholdRule::subset("site", [("B", 0.35)]),
            ThresholdRule::Global(0.5),
        ]);
        let config = SingleConfig::builder()
            .with_threshold_spec(spec)
            .with_strata(["site"])
            .build()
            .unwrap();
        let t = evaluate_single(&basic(), "GT", "Score", &config)
            .unwrap()
            .into_table()
            .unwrap();
        // Site B at 0.35: 0.9, 0.4 and 0.6 predicted positive.
        assert_eq!(t.value(1, "PP"), Some(3.0));
        // Site A at 0.5: only 0.7.
        assert_eq!(t.value(0, "PP"), Some(1.0));
    }

    #[test]
    fn subset_rule_keyed_on_ground_truth_column() {
        let spec = ThresholdSpec::from_rules(vec![ThresholdRule::subset("GT", [(1, 0.35), (0, 0.65)])]);
        let config = SingleConfig::builder()
            .with_threshold_spec(spec)
            .with_strata(["site"])
            .build()
            .unwrap();
        let t = evaluate_single(&basic(), "GT", "Score", &config)
            .unwrap()
            .into_table()
            .unwrap();
        // Positives at 0.35: 0.7, 0.9 and 0.4 all hit. Negatives at 0.65: 0.6 no longer does.
        assert_eq!(t.value(0, "TP"), Some(1.0));
        assert_eq!(t.value(1, "TP"), Some(2.0));
        assert_eq!(t.value(1, "FP"), Some(0.0));
        assert_eq!(t.strata(), ["site"]);
    }

    #[test]
    fn custom_only_sweep_without_thresholds_is_rejected() {
        let config = SweepConfig {
            show_only_custom: true,
            ..SweepConfig::default()
        };
        assert!(matches!(
            evaluate_sweep(&basic(), "GT", "Score", &config),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn sweep_table_is_indexed_by_threshold_even_when_empty() {
        // All positives and an empty linear range leave no candidates.
        let data = table(r#"[{"GT": 1, "Score": 0.9}, {"GT": 1, "Score": 0.4}]"#);
        let config = SweepConfig::builder()
            .with_thresholds_range(0.5, 0.5, 0.1)
            .build()
            .unwrap();
        let t = evaluate_sweep(&data, "GT", "Score", &config)
            .unwrap()
            .into_table()
            .unwrap();
        assert!(t.is_empty());
        assert_eq!(t.index_names(), vec![IMPLICIT_STRATUM, "Threshold"]);
    }

    #[test]
    fn strict_mode_surfaces_unresolved_rows() {
        let spec = ThresholdSpec::from_rules(vec![ThresholdRule::subset("site", [("A", 0.5)])]);
        let config = SingleConfig::builder().with_threshold_spec(spec).build().unwrap();
        let err = evaluate_single(&basic(), "GT", "Score", &config).unwrap_err();
        assert!(matches!(err, Error::UnresolvedThreshold { unresolved: 3 }));
    }

    #[test]
    fn limit_keeps_largest_groups() {
        let data = table(
            r#"[
            {"GT": 1, "Score": 0.9, "site": "C"},
            {"GT": 0, "Score": 0.1, "site": "C"},
            {"GT": 1, "Score": 0.8, "site": "C"},
            {"GT": 1, "Score": 0.9, "site": "A"},
            {"GT": 0, "Score": 0.2, "site": "B"},
            {"GT": 0, "Score": 0.3, "site": "B"}
        ]"#,
        );
        let config = SingleConfig::builder()
            .with_strata(["site"])
            .with_limit(2)
            .build()
            .unwrap();
        let t = evaluate_single(&data, "GT", "Score", &config)
            .unwrap()
            .into_table()
            .unwrap();
        let labels: Vec<&str> = t.rows().iter().map(|r| r.labels[0].as_str()).collect();
        assert_eq!(labels, vec!["B", "C"]);
    }

    #[test]
    fn unpacking_list_strata() {
        let data = table(
            r#"[
            {"GT": 1, "Score": 0.9, "finding": ["mass", "calc"]},
            {"GT": 0, "Score": 0.2, "finding": ["calc"]},
            {"GT": 0, "Score": 0.6, "finding": "mass"}
        ]"#,
        );
        let config = SingleConfig::builder()
            .with_strata(["finding"])
            .unpack_strata(true)
            .build()
            .unwrap();
        let t = evaluate_single(&data, "GT", "Score", &config)
            .unwrap()
            .into_table()
            .unwrap();
        let labels: Vec<&str> = t.rows().iter().map(|r| r.labels[0].as_str()).collect();
        assert_eq!(labels, vec!["calc", "mass"]);
        assert_eq!(t.value(0, "Total"), Some(2.0));
        assert_eq!(t.value(1, "Total"), Some(2.0));
        assert_eq!(t.value(1, "FP"), Some(1.0));
    }

    #[test]
    fn colliding_labels_follow_policy() {
        let data = table(
            r#"[
            {"GT": 1, "Score": 0.9, "site": 1},
            {"GT": 0, "Score": 0.2, "site": "1"},
            {"GT": 0, "Score": 0.1, "site": "1"}
        ]"#,
        );
        let config = SingleConfig::builder().with_strata(["site"]).build().unwrap();
        let t = evaluate_single(&data, "GT", "Score", &config)
            .unwrap()
            .into_table()
            .unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.value(0, "Total"), Some(2.0));
        assert_eq!(t.value(0, "TP"), Some(1.0));

        let config = SingleConfig::builder()
            .with_strata(["site"])
            .with_duplicates(DuplicatePolicy::Reject)
            .build()
            .unwrap();
        assert!(matches!(
            evaluate_single(&data, "GT", "Score", &config),
            Err(Error::DuplicateGroup(_))
        ));
    }

    #[test]
    fn sweep_rows_sorted_by_threshold() {
        let config = SweepConfig::builder()
            .with_strata(["site"])
            .with_custom_thresholds([0.5, 0.5001, 0.25])
            .show_only_custom(true)
            .build()
            .unwrap();
        let t = evaluate_sweep(&basic(), "GT", "Score", &config)
            .unwrap()
            .into_table()
            .unwrap();
        assert!(t.is_sweep());
        assert_eq!(t.index_names(), vec!["site", "Threshold"]);
        let keys: Vec<(String, f64)> = t
            .rows()
            .iter()
            .map(|r| (r.labels[0].clone(), r.threshold.map_or(f64::NAN, Threshold::get)))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("A".to_string(), 0.25),
                ("A".to_string(), 0.5),
                ("B".to_string(), 0.25),
                ("B".to_string(), 0.5),
            ]
        );
    }

    #[test]
    fn sweep_candidates_include_operating_points() {
        let gt = [true, true, false, true, false, true, false, false];
        let scores: Vec<Option<f64>> = [0.95, 0.85, 0.75, 0.65, 0.55, 0.45, 0.35, 0.25]
            .iter()
            .copied()
            .map(Some)
            .collect();
        let set = sweep_candidates(&gt, &scores, &SweepConfig::default()).unwrap();
        let values: Vec<f64> = set.iter().map(Threshold::get).collect();
        // Range 0.40..=0.60, Youden 0.65, Sen/Spec targets.
        for expected in [0.4, 0.45, 0.5, 0.55, 0.6, 0.65, 0.75, 1.0] {
            assert!(values.contains(&expected), "{expected} missing from {values:?}");
        }
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn degenerate_group_keeps_linear_thresholds() {
        let gt = [true, true, true];
        let scores = vec![Some(0.2), Some(0.5), Some(0.9)];
        let set = sweep_candidates(&gt, &scores, &SweepConfig::default()).unwrap();
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn sweep_empty_input_is_a_sentinel() {
        let data = Table::new(["GT", "Score"]);
        let outcome = evaluate_sweep(&data, "GT", "Score", &SweepConfig::default()).unwrap();
        assert_eq!(
            outcome,
            EvalOutcome::NoData(NoDataReason::Empty {
                strata: vec![IMPLICIT_STRATUM.into()]
            })
        );
    }

    #[test]
    fn pm_mode_columns() {
        let t = evaluate_sweep(&basic(), "GT", "Score", &SweepConfig::pm_mode())
            .unwrap()
            .into_table()
            .unwrap();
        assert_eq!(t.len(), 101);
        assert_eq!(t.columns(), ["TP", "FN", "FP", "TN", "Sen", "Spec"]);
    }
}
