//! Trailing-window percentile and cost-saving summaries per entity.

use serde::Serialize;

use crate::data::measures::{MeasureMeta, MeasureRow};

use super::rollup::{EntityKind, EntitySeries};

/// Months of recent history summarised when the caller does not say otherwise.
pub const DEFAULT_TRAILING_MONTHS: usize = 6;

/// Running total of cost savings.
///
/// The total starts unset. A present saving adds to it (an unset total counts
/// as zero); a null saving leaves it untouched. An empty or all-null window
/// finishes at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SavingsAccumulator {
    total: Option<f64>,
}

impl SavingsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add(self, saving: Option<f64>) -> Self {
        match (self.total, saving) {
            (total, None) => Self { total },
            (None, Some(value)) => Self { total: Some(value) },
            (Some(total), Some(value)) => Self {
                total: Some(total + value),
            },
        }
    }

    /// `None` until the first present saving has been added.
    pub fn total(self) -> Option<f64> {
        self.total
    }

    pub fn finish(self) -> f64 {
        self.total.unwrap_or(0.0)
    }
}

impl FromIterator<Option<f64>> for SavingsAccumulator {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::add)
    }
}

/// Recent standing of one entity on one measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
    pub entity_id: String,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub kind: EntityKind,
    pub measure_id: String,
    /// Rows actually present in the trailing window.
    pub months: usize,
    pub mean_percentile: Option<f64>,
    pub cost_saving_50th: f64,
    pub cost_saving_10th: f64,
    #[serde(flatten)]
    pub meta: MeasureMeta,
}

impl AsRef<EntitySummary> for EntitySummary {
    fn as_ref(&self) -> &EntitySummary {
        self
    }
}

/// The last `months` rows of a chronological series.
pub fn trailing_window(rows: &[MeasureRow], months: usize) -> &[MeasureRow] {
    &rows[rows.len().saturating_sub(months)..]
}

/// Mean of the non-null percentiles; `None` when there are none.
pub fn mean_percentile(rows: &[MeasureRow]) -> Option<f64> {
    let (sum, count) = rows
        .iter()
        .filter_map(|row| row.percentile)
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Total saving against `label` across `rows`.
pub fn cost_saving(rows: &[MeasureRow], label: &str) -> f64 {
    rows.iter()
        .map(|row| row.saving_at(label))
        .collect::<SavingsAccumulator>()
        .finish()
}

pub fn summarize(series: &EntitySeries, trailing_months: usize) -> EntitySummary {
    let window = trailing_window(&series.rows, trailing_months);
    EntitySummary {
        entity_id: series.id.clone(),
        name: series.name.clone(),
        display_name: series.display_name(),
        kind: series.kind,
        measure_id: series.measure_id.clone(),
        months: window.len(),
        mean_percentile: mean_percentile(window),
        cost_saving_50th: cost_saving(window, "50"),
        cost_saving_10th: cost_saving(window, "10"),
        meta: series.meta.clone(),
    }
}

pub fn summarize_all(series: &[EntitySeries], trailing_months: usize) -> Vec<EntitySummary> {
    series
        .iter()
        .map(|entity| summarize(entity, trailing_months))
        .collect()
}
