//! End-to-end scenarios for single and sweep evaluation.

use strateval::eval::stratified::IMPLICIT_STRATUM;
use strateval::prelude::*;

fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> Table {
    let mut t = Table::new(columns.iter().copied());
    for row in rows {
        t.push_row(row).unwrap();
    }
    t
}

fn scored(gt: &[i64], scores: &[f64]) -> Table {
    table(
        &["GT", "Score"],
        gt.iter()
            .zip(scores)
            .map(|(&g, &s)| vec![Value::from(g), Value::from(s)])
            .collect(),
    )
}

#[test]
fn single_threshold_reference_scenario() {
    let data = scored(&[1, 1, 0, 0], &[0.9, 0.4, 0.3, 0.2]);
    let outcome = evaluate_single(&data, "GT", "Score", &SingleConfig::default()).unwrap();
    let t = outcome.table().unwrap();

    assert_eq!(t.len(), 1);
    assert_eq!(t.value(0, "TP"), Some(1.0));
    assert_eq!(t.value(0, "FN"), Some(1.0));
    assert_eq!(t.value(0, "FP"), Some(0.0));
    assert_eq!(t.value(0, "TN"), Some(2.0));
    assert_eq!(t.value(0, "Sen"), Some(0.5));
    assert_eq!(t.value(0, "Spec"), Some(1.0));
}

#[test]
fn two_strata_give_two_sorted_rows() {
    let rows = [
        ("B", 1, 0.8),
        ("A", 0, 0.1),
        ("B", 0, 0.3),
        ("A", 1, 0.7),
        ("B", 1, 0.6),
        ("A", 0, 0.55),
    ]
    .into_iter()
    .map(|(s, g, x)| vec![Value::from(g), Value::from(x), Value::from(s)])
    .collect();
    let data = table(&["GT", "Score", "group"], rows);

    let config = SingleConfig::builder().with_strata(["group"]).build().unwrap();
    let t = evaluate_single(&data, "GT", "Score", &config)
        .unwrap()
        .into_table()
        .unwrap();

    assert_eq!(t.len(), 2);
    assert_eq!(t.rows()[0].labels, vec!["A"]);
    assert_eq!(t.rows()[1].labels, vec!["B"]);
    assert_eq!(t.value(0, "Total"), Some(3.0));
    assert_eq!(t.value(1, "Total"), Some(3.0));
}

#[test]
fn empty_after_filtering_is_no_data() {
    let data = table(
        &["GT", "Score"],
        vec![
            vec![Value::from(1), Value::Null],
            vec![Value::Null, Value::from(0.4)],
        ],
    );
    let outcome = evaluate_single(&data, "GT", "Score", &SingleConfig::default()).unwrap();
    assert_eq!(
        outcome,
        EvalOutcome::NoData(NoDataReason::Empty {
            strata: vec![IMPLICIT_STRATUM.to_string()]
        })
    );

    let outcome = evaluate_sweep(&data, "GT", "Score", &SweepConfig::default()).unwrap();
    assert!(outcome.is_no_data());
}

#[test]
fn missing_columns_is_no_data() {
    let data = scored(&[1, 0], &[0.9, 0.1]);
    let outcome = evaluate_sweep(&data, "GT", "Prob", &SweepConfig::default()).unwrap();
    assert_eq!(
        outcome,
        EvalOutcome::NoData(NoDataReason::MissingColumns(vec!["Prob".to_string()]))
    );
}

#[test]
fn custom_thresholds_deduplicated_after_rounding() {
    let data = scored(&[1, 1, 0, 0], &[0.9, 0.4, 0.3, 0.2]);
    let config = SweepConfig::builder()
        .with_custom_thresholds([0.5, 0.5001])
        .show_only_custom(true)
        .build()
        .unwrap();
    let t = evaluate_sweep(&data, "GT", "Score", &config)
        .unwrap()
        .into_table()
        .unwrap();
    assert_eq!(t.len(), 1);
    assert_eq!(t.rows()[0].threshold.map(Threshold::get), Some(0.5));
}

#[test]
fn single_evaluation_is_idempotent() {
    let data = scored(
        &[1, 0, 1, 0, 1, 0, 1, 0],
        &[0.91, 0.12, 0.77, 0.48, 0.35, 0.66, 0.58, 0.05],
    );
    let config = SingleConfig::default();
    let first = evaluate_single(&data, "GT", "Score", &config).unwrap();
    let second = evaluate_single(&data, "GT", "Score", &config).unwrap();

    let (a, b) = (first.table().unwrap(), second.table().unwrap());
    assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
    assert_eq!(a.to_string(), b.to_string());
}

#[test]
fn score_statistics_suppressed_with_few_distinct_scores() {
    // Eight rows, five distinct scores.
    let data = scored(
        &[1, 1, 1, 1, 0, 0, 0, 0],
        &[0.9, 0.9, 0.7, 0.5, 0.5, 0.3, 0.1, 0.1],
    );
    let t = evaluate_single(&data, "GT", "Score", &SingleConfig::default())
        .unwrap()
        .into_table()
        .unwrap();
    for column in ["AUC", "Far FN", "Far FP", "[0.4, 0.6)"] {
        assert!(t.value(0, column).unwrap().is_nan(), "{column}");
    }
    assert!(t.value(0, "Sen").unwrap().is_finite());

    // One more distinct score brings them back.
    let data = scored(
        &[1, 1, 1, 1, 0, 0, 0, 0],
        &[0.9, 0.8, 0.7, 0.5, 0.5, 0.3, 0.1, 0.1],
    );
    let t = evaluate_single(&data, "GT", "Score", &SingleConfig::default())
        .unwrap()
        .into_table()
        .unwrap();
    let auc = t.value(0, "AUC").unwrap();
    assert!(auc > 0.5 && auc <= 1.0);
    assert_eq!(t.value(0, "[0.4, 0.6)"), Some(2.0));
}

#[test]
fn null_scores_yield_no_prediction_under_all_policy() {
    let data = table(
        &["GT", "Score"],
        vec![
            vec![Value::from(1), Value::from(0.9)],
            vec![Value::from(0), Value::from(0.2)],
            vec![Value::from(1), Value::Null],
        ],
    );
    let config = SingleConfig::builder()
        .with_null_policy(NullPolicy::All)
        .build()
        .unwrap();
    let t = evaluate_single(&data, "GT", "Score", &config)
        .unwrap()
        .into_table()
        .unwrap();
    assert_eq!(t.value(0, "Total"), Some(2.0));
    assert_eq!(t.value(0, "P"), Some(1.0));
}

#[test]
fn invalid_threshold_is_an_error() {
    let data = scored(&[1, 0], &[0.9, 0.1]);
    let config = SingleConfig {
        threshold: ThresholdSpec::global(1.5),
        ..SingleConfig::default()
    };
    assert!(matches!(
        evaluate_single(&data, "GT", "Score", &config),
        Err(Error::InvalidThreshold(_))
    ));
}

#[test]
fn sweep_from_json_config_and_records() {
    let data = Table::from_json_records(
        r#"[
        {"label": true,  "prob": 0.95, "site": "north"},
        {"label": true,  "prob": 0.81, "site": "north"},
        {"label": false, "prob": 0.64, "site": "north"},
        {"label": true,  "prob": 0.52, "site": "north"},
        {"label": false, "prob": 0.33, "site": "north"},
        {"label": false, "prob": 0.12, "site": "north"},
        {"label": true,  "prob": 0.71, "site": "south"},
        {"label": false, "prob": 0.22, "site": "south"}
    ]"#,
    )
    .unwrap();
    let config: SweepConfig = serde_json::from_str(r#"{"strata": ["site"]}"#).unwrap();
    let t = evaluate_sweep(&data, "label", "prob", &config)
        .unwrap()
        .into_table()
        .unwrap();

    // Sorted by site, then threshold.
    let keys: Vec<(String, f64)> = t
        .rows()
        .iter()
        .map(|r| (r.labels[0].clone(), r.threshold.map_or(f64::NAN, Threshold::get)))
        .collect();
    let (north, south): (Vec<_>, Vec<_>) = keys.iter().partition(|(s, _)| s == "north");
    assert!(!north.is_empty() && !south.is_empty());
    assert!(keys.iter().take(north.len()).all(|(s, _)| s == "north"));
    for (_, t) in &keys {
        assert!((0.0..=1.0).contains(t));
    }
    for window in north.windows(2) {
        assert!(window[0].1 < window[1].1);
    }

    let json: serde_json::Value = serde_json::from_str(&t.to_json().unwrap()).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(t.len()));
}

#[test]
fn single_class_stratum_does_not_abort_sweep() {
    let mut rows: Vec<Vec<Value>> = [0.95, 0.85, 0.75, 0.65, 0.55, 0.45, 0.35, 0.25]
        .into_iter()
        .zip([1, 1, 0, 1, 0, 1, 0, 0])
        .map(|(s, g)| vec![Value::from(g), Value::from(s), Value::from("mixed")])
        .collect();
    rows.extend(
        [0.9, 0.6, 0.3]
            .into_iter()
            .map(|s| vec![Value::from(1), Value::from(s), Value::from("positive-only")]),
    );
    let data = table(&["GT", "Score", "site"], rows);

    let config = SweepConfig::builder()
        .with_strata(["site"])
        .with_custom_thresholds([0.33])
        .build()
        .unwrap();
    let t = evaluate_sweep(&data, "GT", "Score", &config)
        .unwrap()
        .into_table()
        .unwrap();

    let thresholds = |site: &str| -> Vec<f64> {
        t.rows()
            .iter()
            .filter(|r| r.labels[0] == site)
            .filter_map(|r| r.threshold.map(Threshold::get))
            .collect()
    };

    // Custom plus the linear 0.40..=0.60 grid, no operating points.
    assert_eq!(thresholds("positive-only"), vec![0.33, 0.4, 0.45, 0.5, 0.55, 0.6]);
    let row = t.find(&["positive-only"], Threshold::new(0.5)).unwrap();
    assert_eq!(row.record.counts.tp, 2);
    assert!(row.record.specificity.point.is_nan());

    // The mixed stratum still gets its ROC-derived thresholds.
    let mixed = thresholds("mixed");
    assert!(mixed.contains(&0.65) && mixed.contains(&0.75) && mixed.contains(&1.0));
    assert!(mixed.len() > 6);
}
