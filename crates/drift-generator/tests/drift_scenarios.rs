//! Scenario tests over whole timelines built from YAML configurations.

use drift_core::{DriftConfig, FieldValue};
use drift_generator::{produce, DayBatch, VALUES_SCALE_FACTOR};

fn run(yaml: &str) -> Vec<DayBatch> {
    let config = DriftConfig::from_yaml(yaml).unwrap();
    produce(&config)
        .unwrap()
        .map(|batch| batch.unwrap())
        .collect()
}

fn column<'a>(batch: &'a DayBatch, key: &str) -> Vec<&'a FieldValue> {
    batch
        .records
        .iter()
        .filter_map(|record| record.get_field(key))
        .collect()
}

#[test]
fn test_increment_is_gapless_with_jitter() {
    let batches = run(r#"
seed: 3
num_days: 6
approx_rows_per_day: 40
columns:
  - name: id
    data_type: integer
    distribution: increment
"#);

    let ids: Vec<i64> = batches
        .iter()
        .flat_map(|batch| column(batch, "id"))
        .map(|value| value.as_i64().unwrap())
        .collect();
    assert_eq!(ids, (0..ids.len() as i64).collect::<Vec<_>>());

    let indexes: Vec<u64> = batches
        .iter()
        .flat_map(|batch| batch.records.iter().map(|record| record.index))
        .collect();
    assert_eq!(indexes, (0..indexes.len() as u64).collect::<Vec<_>>());
}

#[test]
fn test_scale_applies_from_transition_point() {
    let batches = run(r#"
seed: 11
num_days: 4
approx_rows_per_day: 25
row_variation_percentage: 0.0
random_day_reduction_probability: 0.0
columns:
  - name: id
    data_type: integer
    distribution: [increment]
    transition_percentage: 0.5
    transition_type: [values_scale]
"#);

    for batch in &batches {
        for record in &batch.records {
            let value = record.get_field("id").unwrap().as_i64().unwrap();
            let expected = if batch.day < 2 {
                record.index as i64
            } else {
                record.index as i64 * VALUES_SCALE_FACTOR
            };
            assert_eq!(value, expected, "day {} row {}", batch.day, record.index);
        }
    }
}

#[test]
fn test_nulls_rise_after_transition() {
    let batches = run(r#"
seed: 5
num_days: 2
approx_rows_per_day: 5000
row_variation_percentage: 0.0
random_day_reduction_probability: 0.0
columns:
  - name: nulls1
    data_type: integer
    distribution: uniform
    transition_percentage: 0.5
    transition_type: nulls_high
"#);

    let null_rate = |batch: &DayBatch| {
        let values = column(batch, "nulls1");
        values.iter().filter(|v| v.is_null()).count() as f64 / values.len() as f64
    };
    assert_eq!(null_rate(&batches[0]), 0.0);
    assert!((null_rate(&batches[1]) - 0.3).abs() < 0.05);
}

#[test]
fn test_baseline_rates_apply_before_transition() {
    let batches = run(r#"
seed: 9
num_days: 2
approx_rows_per_day: 4000
row_variation_percentage: 0.0
random_day_reduction_probability: 0.0
rates:
  null_baseline: 0.1
  zero_baseline: 0.05
columns:
  - name: steady
    data_type: float
    distribution: normal
"#);

    let values = column(&batches[0], "steady");
    let nulls = values.iter().filter(|v| v.is_null()).count() as f64 / values.len() as f64;
    let zeros = values.iter().filter(|v| v.is_zero()).count() as f64 / values.len() as f64;
    assert!((nulls - 0.1).abs() < 0.05, "null rate {nulls}");
    assert!((zeros - 0.045).abs() < 0.05, "zero rate {zeros}");
}

#[test]
fn test_default_layout_drifts() {
    let config = DriftConfig::with_default_columns()
        .with_timeline(10, 60)
        .without_jitter();
    let mut timeline = produce(&config).unwrap();
    let batches: Vec<DayBatch> = timeline.by_ref().map(|batch| batch.unwrap()).collect();

    assert!(column(&batches[0], "normal1").len() == 60);
    assert!(column(&batches[9], "new-normal1").len() == 60);
    assert!(column(&batches[9], "uniform3")
        .iter()
        .all(|v| v.as_str().is_some_and(|s| s.starts_with("all-"))));
    assert!(column(&batches[0], "uniform3").iter().all(|v| v.as_f64().is_some()));
    assert!(column(&batches[0], "descStr1")
        .iter()
        .all(|v| v.as_str().unwrap().split(' ').count() == 20));

    let metrics = timeline.metrics();
    assert_eq!(metrics.total_rows, 600);
    assert_eq!(metrics.column("normal1").unwrap().first_active_day, Some(2));
    assert_eq!(metrics.column("uniform3").unwrap().first_active_day, Some(9));
    assert_eq!(metrics.column("catStrSteady2").unwrap().activated_rows, 0);
}
