//! Pairwise join of a numerator and a denominator series.
//!
//! Both inputs are keyed by (entity, month). Every key present on either side
//! yields exactly one [`CombinedRow`]; the absent side is zero-filled.

pub mod ratio;
pub mod selector;

use std::cmp::Ordering;

use chrono::NaiveDate;
use indexmap::{map::Entry, IndexMap};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    data::rows::{self, Measurements, TimeSeriesRow, PRACTICE_SETTING},
    error::EngineResult,
};

use self::{
    ratio::Ratio,
    selector::{DenominatorSelector, RatioFamily},
};

/// One entity in one month with both sides of the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedRow {
    pub entity_id: String,
    pub entity_name: Option<String>,
    pub display_name: Option<String>,
    pub month: NaiveDate,
    pub setting: Option<i32>,
    pub numerator: Measurements,
    pub denominator: Measurements,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub ratio_items: Ratio,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub ratio_actual_cost: Ratio,
}

impl CombinedRow {
    pub fn ratio(&self, family: RatioFamily) -> Ratio {
        match family {
            RatioFamily::Items => self.ratio_items,
            RatioFamily::ActualCost => self.ratio_actual_cost,
        }
    }

    fn set_ratio(&mut self, family: RatioFamily, value: Ratio) {
        match family {
            RatioFamily::Items => self.ratio_items = value,
            RatioFamily::ActualCost => self.ratio_actual_cost = value,
        }
    }

    /// Numerator raw value of a family; missing counts as zero activity.
    pub fn numerator_value(&self, family: RatioFamily) -> f64 {
        self.numerator.field(family.field()).or_zero()
    }
}

/// Join, filter, compute ratios and sort: the full comparison pipeline.
pub fn combine(
    numerator: &[TimeSeriesRow],
    denominator: &[TimeSeriesRow],
    selector: &DenominatorSelector,
) -> Vec<CombinedRow> {
    let merged = merge(numerator, denominator);
    let joined = merged.len();
    let kept = retain_practice_settings(merged);
    debug!(
        numerator = numerator.len(),
        denominator = denominator.len(),
        joined,
        dropped = joined - kept.len(),
        %selector,
        "combined series"
    );
    sort_by_month_and_ratio(calculate_ratios(kept, selector))
}

/// [`combine`] over raw upstream JSON rows.
pub fn combine_values(
    numerator: &[Value],
    denominator: &[Value],
    selector: &DenominatorSelector,
) -> EngineResult<Vec<CombinedRow>> {
    let numerator = rows::parse_rows(numerator)?;
    let denominator = rows::parse_rows(denominator)?;
    Ok(combine(&numerator, &denominator, selector))
}

/// Union of both inputs keyed by (entity, month), in first-seen order with
/// denominator rows first.
pub fn merge(numerator: &[TimeSeriesRow], denominator: &[TimeSeriesRow]) -> Vec<CombinedRow> {
    let numerator_schema = schema_of(numerator);
    let denominator_schema = schema_of(denominator);

    let mut joined: IndexMap<(String, NaiveDate), CombinedRow> = IndexMap::new();
    for row in denominator {
        joined.insert(
            (row.entity_id.clone(), row.month),
            CombinedRow {
                entity_id: row.entity_id.clone(),
                entity_name: row.entity_name.clone(),
                display_name: None,
                month: row.month,
                setting: row.setting,
                numerator: numerator_schema.zeroed(),
                denominator: row.measurements.clone(),
                ratio_items: None,
                ratio_actual_cost: None,
            },
        );
    }

    for row in numerator {
        match joined.entry((row.entity_id.clone(), row.month)) {
            Entry::Occupied(mut entry) => {
                let combined = entry.get_mut();
                combined.numerator = row.measurements.clone();
                if row.setting.is_some() {
                    combined.setting = row.setting;
                }
                if row.entity_name.is_some() {
                    combined.entity_name = row.entity_name.clone();
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(CombinedRow {
                    entity_id: row.entity_id.clone(),
                    entity_name: row.entity_name.clone(),
                    display_name: None,
                    month: row.month,
                    setting: row.setting,
                    numerator: row.measurements.clone(),
                    denominator: denominator_schema.zeroed(),
                    ratio_items: None,
                    ratio_actual_cost: None,
                });
            }
        }
    }

    joined
        .into_values()
        .map(|mut row| {
            row.display_name = display_name(&row.entity_id, row.entity_name.as_deref());
            row
        })
        .collect()
}

/// Drop rows classified as anything other than a standard practice.
/// Rows with no setting (aggregate levels) always survive.
pub fn retain_practice_settings(rows: Vec<CombinedRow>) -> Vec<CombinedRow> {
    rows.into_iter()
        .filter(|row| row.setting.map_or(true, |setting| setting == PRACTICE_SETTING))
        .collect()
}

/// Fill `ratio_items` and `ratio_actual_cost` for every row.
pub fn calculate_ratios(
    mut rows: Vec<CombinedRow>,
    selector: &DenominatorSelector,
) -> Vec<CombinedRow> {
    let scale = selector.scale();
    for row in &mut rows {
        for family in RatioFamily::ALL {
            let denominator = selector.resolve(family, &row.denominator);
            let value = ratio::ratio(row.numerator_value(family), denominator, scale);
            row.set_ratio(family, value);
        }
    }
    rows
}

/// Month ascending, then item ratio ascending. Stable; `-0.0` ties with null.
pub fn sort_by_month_and_ratio(mut rows: Vec<CombinedRow>) -> Vec<CombinedRow> {
    rows.sort_by(|a, b| {
        a.month.cmp(&b.month).then_with(|| {
            ratio::sort_value(a.ratio_items)
                .partial_cmp(&ratio::sort_value(b.ratio_items))
                .unwrap_or(Ordering::Equal)
        })
    });
    rows
}

/// `"{name} ({id})"` for labelling, or `None` without a name.
pub fn display_name(id: &str, name: Option<&str>) -> Option<String> {
    name.map(|name| format!("{name} ({id})"))
}

fn schema_of(rows: &[TimeSeriesRow]) -> Measurements {
    let mut schema = Measurements::default();
    for row in rows {
        schema.absorb_schema(&row.measurements);
    }
    schema
}
