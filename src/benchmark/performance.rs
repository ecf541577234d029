//! Headline figures across all benchmarked entities.

use serde::Serialize;

use super::summary::EntitySummary;

const MEDIAN: f64 = 50.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub entities: usize,
    pub with_percentile: usize,
    pub worse_than_median: usize,
    pub proportion_worse_than_median: Option<f64>,
    /// Sum of positive savings only; entities already better than the
    /// target do not offset the others.
    pub potential_saving_50th: f64,
    pub potential_saving_10th: f64,
}

pub fn performance_summary<T: AsRef<EntitySummary>>(entities: &[T]) -> PerformanceSummary {
    let mut summary = PerformanceSummary {
        entities: entities.len(),
        ..PerformanceSummary::default()
    };
    for entity in entities.iter().map(AsRef::as_ref) {
        if let Some(percentile) = entity.mean_percentile {
            summary.with_percentile += 1;
            if worse_than_median(percentile, entity.meta.low_is_good) {
                summary.worse_than_median += 1;
            }
        }
        summary.potential_saving_50th += entity.cost_saving_50th.max(0.0);
        summary.potential_saving_10th += entity.cost_saving_10th.max(0.0);
    }
    summary.proportion_worse_than_median = (summary.with_percentile > 0)
        .then(|| summary.worse_than_median as f64 / summary.with_percentile as f64);
    summary
}

fn worse_than_median(percentile: f64, low_is_good: Option<bool>) -> bool {
    if low_is_good == Some(false) {
        percentile < MEDIAN
    } else {
        percentile > MEDIAN
    }
}
