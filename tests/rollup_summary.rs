use rx_benchmark::{
    benchmark::{
        rollup::{self, EntityKind},
        summary::{self, SavingsAccumulator},
    },
    data::measures::{MeasureSeries, RollupKey},
    EngineError,
};
use serde_json::json;

fn measure(value: serde_json::Value) -> MeasureSeries {
    serde_json::from_value(value).expect("valid measure")
}

#[test]
fn savings_accumulator_starts_unset() {
    let acc = SavingsAccumulator::new();
    assert_eq!(acc.total(), None);
    assert_eq!(acc.finish(), 0.0);

    let acc = acc.add(None);
    assert_eq!(acc.total(), None);
    assert_eq!(acc.finish(), 0.0);

    let acc = acc.add(Some(2.5));
    assert_eq!(acc.total(), Some(2.5));
}

#[test]
fn interior_null_saving_is_skipped() {
    let acc: SavingsAccumulator = [Some(5.0), None, Some(3.0)].into_iter().collect();
    assert_eq!(acc.finish(), 8.0);

    let acc: SavingsAccumulator = [None, None, Some(-4.0), None].into_iter().collect();
    assert_eq!(acc.total(), Some(-4.0));
}

#[test]
fn all_null_window_saves_nothing() {
    let acc: SavingsAccumulator = [None, None].into_iter().collect();
    assert_eq!(acc.finish(), 0.0);
}

#[test]
fn mean_percentile_over_short_window() {
    let series = measure(json!({
        "id": "ktt9_cephalosporins",
        "data": [
            {"date": "2015-01-01", "pct_id": "03V", "calc_value": 10, "percentile": 40},
            {"date": "2015-02-01", "pct_id": "03V", "calc_value": 12, "percentile": 37}
        ]
    }));
    let entities = rollup::roll_up_by_org(&series, RollupKey::Ccg).unwrap();
    assert_eq!(entities.len(), 1);

    let summary = summary::summarize(&entities[0], 6);
    assert_eq!(summary.entity_id, "03V");
    assert_eq!(summary.months, 2);
    assert_eq!(summary.mean_percentile, Some(38.5));
}

#[test]
fn null_percentiles_leave_the_mean() {
    let series = measure(json!({
        "id": "m",
        "data": [
            {"date": "2015-01-01", "pct_id": "A", "percentile": 40},
            {"date": "2015-02-01", "pct_id": "A", "percentile": null},
            {"date": "2015-03-01", "pct_id": "A", "percentile": 20},
            {"date": "2015-01-01", "pct_id": "B", "percentile": null},
            {"date": "2015-02-01", "pct_id": "B"}
        ]
    }));
    let entities = rollup::roll_up_by_org(&series, RollupKey::Ccg).unwrap();
    let summaries = summary::summarize_all(&entities, 6);
    assert_eq!(summaries[0].mean_percentile, Some(30.0));
    assert_eq!(summaries[1].mean_percentile, None);
}

#[test]
fn only_the_trailing_window_counts() {
    let data: Vec<_> = (1..=8)
        .map(|m: u32| {
            let percentile = if m <= 2 { 100 } else { 50 };
            let saving = f64::from(m);
            json!({
                "date": format!("2016-{m:02}-01"),
                "practice_id": "P1",
                "percentile": percentile,
                "cost_savings": {"10": 1.0, "50": saving}
            })
        })
        .collect();
    let series = measure(json!({"id": "m", "data": data}));
    let entities = rollup::roll_up_by_org(&series, RollupKey::Practice).unwrap();
    let summary = summary::summarize(&entities[0], 6);
    assert_eq!(summary.months, 6);
    assert_eq!(summary.mean_percentile, Some(50.0));
    assert_eq!(summary.cost_saving_50th, 3.0 + 4.0 + 5.0 + 6.0 + 7.0 + 8.0);
    assert_eq!(summary.cost_saving_10th, 6.0);
}

#[test]
fn missing_savings_records_do_not_zero_the_total() {
    let series = measure(json!({
        "id": "m",
        "data": [
            {"date": "2016-01-01", "pct_id": "A", "cost_savings": {"50": 100.0, "10": 300.0}},
            {"date": "2016-02-01", "pct_id": "A"},
            {"date": "2016-03-01", "pct_id": "A", "cost_savings": {"50": null, "10": 20.0}},
            {"date": "2016-04-01", "pct_id": "A", "cost_savings": {"50": -25.0, "10": 10.0}}
        ]
    }));
    let entities = rollup::roll_up_by_org(&series, RollupKey::Ccg).unwrap();
    let summary = summary::summarize(&entities[0], 6);
    assert_eq!(summary.cost_saving_50th, 75.0);
    assert_eq!(summary.cost_saving_10th, 330.0);
}

#[test]
fn rollup_groups_in_first_seen_order_with_sorted_rows() {
    let series = measure(json!({
        "id": "ktt3_lipid_modifying_drugs",
        "isPercentage": true,
        "isCostBased": false,
        "lowIsGood": true,
        "numeratorShort": "High-cost items",
        "denominator_short": "All items",
        "data": [
            {"date": "2016-03-01", "pct_id": "99P", "pct_name": "NHS North Devon", "percentile": 10},
            {"date": "2016-01-01", "pct_id": "03V", "pct_name": "NHS Corby", "percentile": 20},
            {"date": "2016-01-01", "pct_id": "99P", "percentile": 30}
        ]
    }));
    let entities = rollup::roll_up_by_org(&series, RollupKey::Ccg).unwrap();
    let ids: Vec<&str> = entities.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["99P", "03V"]);

    let devon = &entities[0];
    assert_eq!(devon.kind, EntityKind::Organization);
    assert_eq!(devon.name.as_deref(), Some("NHS North Devon"));
    assert_eq!(devon.display_name().as_deref(), Some("NHS North Devon (99P)"));
    assert_eq!(devon.rows[0].percentile, Some(30.0));
    assert_eq!(devon.rows[1].percentile, Some(10.0));
    assert!(devon.meta.is_percentage);
    assert!(!devon.meta.is_cost_based);
    assert_eq!(devon.meta.low_is_good, Some(true));
    assert_eq!(devon.meta.numerator_short.as_deref(), Some("High-cost items"));
    assert_eq!(devon.meta.denominator_short.as_deref(), Some("All items"));
}

#[test]
fn rows_without_the_grouping_key_fail() {
    let series = measure(json!({
        "id": "m",
        "data": [{"date": "2016-01-01", "pct_id": "03V"}]
    }));
    let err = rollup::roll_up_by_org(&series, RollupKey::Practice).unwrap_err();
    assert!(matches!(
        err,
        EngineError::MissingGroupKey { index: 0, key: "practice_id", .. }
    ));
}

#[test]
fn unknown_org_type_is_rejected() {
    let err = "region".parse::<RollupKey>().unwrap_err();
    assert!(matches!(err, EngineError::UnhandledOrgType(ref kind) if kind == "region"));

    let series = measure(json!({"id": "m", "data": []}));
    let err = rollup::roll_up_by_org(&series, RollupKey::Measure).unwrap_err();
    assert!(matches!(err, EngineError::UnhandledOrgType(_)));
}

#[test]
fn measure_rollup_yields_aggregates() {
    let measures = vec![
        measure(json!({"id": "lpzomnibus", "name": "Low priority", "data": [
            {"date": "2016-02-01", "percentile": 60},
            {"date": "2016-01-01", "percentile": 70}
        ]})),
        measure(json!({"id": "ktt9_cephalosporins", "data": []})),
    ];
    let entities = rollup::roll_up(&measures, RollupKey::Measure).unwrap();
    assert_eq!(entities.len(), 2);
    assert!(entities.iter().all(|e| e.kind == EntityKind::Aggregate));
    assert_eq!(entities[0].measure_id, "lpzomnibus");
    assert_eq!(entities[0].rows[0].percentile, Some(70.0));

    let empty = summary::summarize(&entities[1], 6);
    assert_eq!(empty.months, 0);
    assert_eq!(empty.mean_percentile, None);
    assert_eq!(empty.cost_saving_50th, 0.0);
}

#[test]
fn percentage_measures_chart_on_a_hundred_scale() {
    let series = measure(json!({
        "id": "m",
        "is_percentage": true,
        "data": [
            {"date": "2016-01-01", "pct_id": "A", "calc_value": 0.25},
            {"date": "2016-02-01", "pct_id": "A", "calc_value": null}
        ]
    }));
    let entities = rollup::roll_up_by_org(&series, RollupKey::Ccg).unwrap();
    let points = entities[0].chart_points();
    assert_eq!(points[0].value, Some(25.0));
    assert_eq!(points[1].value, None);
}
