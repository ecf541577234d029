use rx_benchmark::{
    benchmark::{self, centiles::KEY_CENTILES, performance, BenchmarkRequest},
    data::measures::{GlobalMeasure, MeasureSeries, RollupKey},
    EngineError,
};
use serde_json::json;

fn measures() -> Vec<MeasureSeries> {
    let measure = serde_json::from_value(json!({
        "id": "ktt9_cephalosporins",
        "name": "Cephalosporins",
        "low_is_good": true,
        "is_cost_based": true,
        "data": [
            {"date": "2016-01-01", "pct_id": "A", "percentile": 80,
             "cost_savings": {"10": 200.0, "50": 100.0}},
            {"date": "2016-02-01", "pct_id": "A", "percentile": 90,
             "cost_savings": {"10": 100.0, "50": 50.0}},
            {"date": "2016-01-01", "pct_id": "B", "percentile": 20,
             "cost_savings": {"10": 10.0, "50": -40.0}},
            {"date": "2016-02-01", "pct_id": "B", "percentile": 30,
             "cost_savings": {"10": 5.0, "50": -10.0}},
            {"date": "2016-01-01", "pct_id": "C", "percentile": null},
            {"date": "2016-02-01", "pct_id": "C", "percentile": null}
        ]
    }))
    .expect("valid measure");
    vec![measure]
}

fn global() -> GlobalMeasure {
    serde_json::from_value(json!({
        "id": "ktt9_cephalosporins",
        "data": [
            {"date": "2016-01-01", "percentiles": {"ccg": {"10": 1.0, "90": 9.0}}},
            {"date": "2016-02-01", "percentiles": {"ccg": {"10": 2.0, "90": 8.0}}}
        ]
    }))
    .expect("valid global")
}

#[test]
fn report_ranks_and_totals_organizations() {
    let measures = measures();
    let global = global();
    let report = benchmark::benchmark_report(&BenchmarkRequest {
        measures: &measures,
        global: Some(&global),
        rollup: RollupKey::Ccg,
        trailing_months: 6,
        pinned_id: None,
        centile_labels: &KEY_CENTILES,
    })
    .unwrap();

    let order: Vec<&str> = report
        .entities
        .iter()
        .map(|e| e.summary.entity_id.as_str())
        .collect();
    assert_eq!(order, vec!["A", "B", "C"]);

    let a = &report.entities[0].summary;
    assert_eq!(a.mean_percentile, Some(85.0));
    assert_eq!(a.cost_saving_50th, 150.0);
    assert_eq!(a.cost_saving_10th, 300.0);
    assert!(a.meta.is_cost_based);
    assert_eq!(report.entities[0].points.len(), 2);

    let perf = &report.performance;
    assert_eq!(perf.entities, 3);
    assert_eq!(perf.with_percentile, 2);
    assert_eq!(perf.worse_than_median, 1);
    assert_eq!(perf.proportion_worse_than_median, Some(0.5));
    assert_eq!(perf.potential_saving_50th, 150.0);
    assert_eq!(perf.potential_saving_10th, 315.0);

    assert_eq!(report.centiles.y_max, 9.0);
    assert_eq!(report.centiles.y_min, 1.0);
}

#[test]
fn unknown_global_leaves_report_without_centiles() {
    let measures = measures();
    let report = benchmark::benchmark_report(&BenchmarkRequest {
        measures: &measures,
        global: None,
        rollup: RollupKey::Ccg,
        trailing_months: 1,
        pinned_id: None,
        centile_labels: &KEY_CENTILES,
    })
    .unwrap();
    assert!(report.centiles.centiles.is_empty());
    // Only February is in a one-month window.
    assert_eq!(report.entities[0].summary.mean_percentile, Some(90.0));
}

#[test]
fn empty_performance_has_no_proportion() {
    let summary = performance::performance_summary::<benchmark::BenchmarkedEntity>(&[]);
    assert_eq!(summary.entities, 0);
    assert_eq!(summary.proportion_worse_than_median, None);
}

fn single_org(id: &str) -> MeasureSeries {
    serde_json::from_value(json!({
        "id": id,
        "data": [{"date": "2016-01-01", "pct_id": "A", "percentile": 50}]
    }))
    .expect("valid measure")
}

#[test]
fn organization_ranking_stays_within_one_measure() {
    let measures = vec![single_org("m1"), single_org("m2")];
    let global = global();
    let err = benchmark::benchmark_report(&BenchmarkRequest {
        measures: &measures,
        global: Some(&global),
        rollup: RollupKey::Ccg,
        trailing_months: 6,
        pinned_id: None,
        centile_labels: &KEY_CENTILES,
    })
    .unwrap_err();
    assert!(matches!(err, EngineError::MixedMeasures { rollup: "ccg", count: 2 }));

    // Across measures the same payload is a per-measure listing without an overlay.
    let report = benchmark::benchmark_report(&BenchmarkRequest {
        measures: &measures,
        global: Some(&global),
        rollup: RollupKey::Measure,
        trailing_months: 6,
        pinned_id: None,
        centile_labels: &KEY_CENTILES,
    })
    .unwrap();
    assert_eq!(report.entities.len(), 2);
    assert!(report.centiles.centiles.is_empty());
}

#[test]
fn national_data_for_another_measure_is_ignored() {
    let measures = vec![single_org("m1")];
    let global = global();
    let report = benchmark::benchmark_report(&BenchmarkRequest {
        measures: &measures,
        global: Some(&global),
        rollup: RollupKey::Ccg,
        trailing_months: 6,
        pinned_id: None,
        centile_labels: &KEY_CENTILES,
    })
    .unwrap();
    assert_eq!(report.entities.len(), 1);
    assert!(report.centiles.centiles.is_empty());
    assert_eq!((report.centiles.y_max, report.centiles.y_min), (0.0, 0.0));
}
