//! Percentile rollup, ranking and cost-saving layer.

pub mod centiles;
pub mod performance;
pub mod rollup;
pub mod sort;
pub mod summary;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::{
    data::measures::{GlobalMeasure, MeasureMeta, MeasureSeries, RollupKey},
    error::EngineResult,
};

use self::{
    centiles::CentileExtent,
    performance::PerformanceSummary,
    summary::EntitySummary,
};

/// A single `{month, value}` chart point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub month: NaiveDate,
    pub value: Option<f64>,
}

/// Percentage measures are charted on a 0-100 scale.
pub fn chart_value(value: f64, meta: &MeasureMeta) -> f64 {
    if meta.is_percentage {
        value * 100.0
    } else {
        value
    }
}

/// Summary of one entity together with its chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkedEntity {
    #[serde(flatten)]
    pub summary: EntitySummary,
    pub points: Vec<SeriesPoint>,
}

impl AsRef<EntitySummary> for BenchmarkedEntity {
    fn as_ref(&self) -> &EntitySummary {
        &self.summary
    }
}

/// Everything one benchmarking view needs.
#[derive(Debug, Clone)]
pub struct BenchmarkRequest<'a> {
    pub measures: &'a [MeasureSeries],
    pub global: Option<&'a GlobalMeasure>,
    pub rollup: RollupKey,
    pub trailing_months: usize,
    pub pinned_id: Option<&'a str>,
    pub centile_labels: &'a [&'a str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub rollup: RollupKey,
    pub trailing_months: usize,
    pub entities: Vec<BenchmarkedEntity>,
    pub centiles: CentileExtent,
    pub performance: PerformanceSummary,
}

/// Roll up, summarise, rank and overlay national centiles.
pub fn benchmark_report(request: &BenchmarkRequest<'_>) -> EngineResult<BenchmarkReport> {
    let series = rollup::roll_up(request.measures, request.rollup)?;
    let entities: Vec<BenchmarkedEntity> = series
        .iter()
        .map(|entity| BenchmarkedEntity {
            summary: summary::summarize(entity, request.trailing_months),
            points: entity.chart_points(),
        })
        .collect();
    let entities = sort::sort_entities(entities, request.pinned_id);
    let performance = performance::performance_summary(&entities);
    // National data for another measure must not set this view's scale.
    let global = request
        .global
        .filter(|global| request.measures.iter().all(|m| m.id == global.id));
    let centiles = centiles::extract_centiles(global, request.rollup, request.centile_labels);

    debug!(
        measures = request.measures.len(),
        entities = entities.len(),
        rollup = %request.rollup,
        months = request.trailing_months,
        "built benchmark report"
    );
    Ok(BenchmarkReport {
        rollup: request.rollup,
        trailing_months: request.trailing_months,
        entities,
        centiles,
        performance,
    })
}
