//! National centile overlays and a shared y-axis extent.

use indexmap::IndexMap;
use serde::Serialize;

use crate::data::measures::{GlobalMeasure, RollupKey};

use super::{chart_value, SeriesPoint};

/// Centiles drawn as benchmark overlays.
pub const KEY_CENTILES: [&str; 9] = ["10", "20", "30", "40", "50", "60", "70", "80", "90"];

const UPPER_CENTILE: &str = "90";
const LOWER_CENTILE: &str = "10";

/// Centile series per label plus the y-range they span.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CentileExtent {
    pub centiles: IndexMap<String, Vec<SeriesPoint>>,
    pub y_max: f64,
    pub y_min: f64,
}

/// Pull `labels` out of the national series for the organization type.
///
/// Empty when there is no reference data, or when the view spans several
/// measures and a shared scale would mean nothing.
pub fn extract_centiles(
    global: Option<&GlobalMeasure>,
    key: RollupKey,
    labels: &[&str],
) -> CentileExtent {
    if key == RollupKey::Measure {
        return CentileExtent::default();
    }
    let Some(global) = global else {
        return CentileExtent::default();
    };

    let centiles: IndexMap<String, Vec<SeriesPoint>> = labels
        .iter()
        .map(|label| (label.to_string(), centile_series(global, key, label)))
        .collect();

    let y_max = centile_series(global, key, UPPER_CENTILE)
        .iter()
        .filter_map(|point| point.value)
        .reduce(f64::max)
        .unwrap_or(0.0);
    let y_min = centile_series(global, key, LOWER_CENTILE)
        .iter()
        .filter_map(|point| point.value)
        .reduce(f64::min)
        .unwrap_or(0.0);

    CentileExtent {
        centiles,
        y_max,
        y_min,
    }
}

/// One centile of a national series, chronological and on the chart scale.
pub fn centile_series(global: &GlobalMeasure, key: RollupKey, label: &str) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = global
        .data
        .iter()
        .map(|row| SeriesPoint {
            month: row.date,
            value: row
                .centile(key.percentile_key(), label)
                .map(|value| chart_value(value, &global.meta)),
        })
        .collect();
    points.sort_by_key(|point| point.month);
    points
}
