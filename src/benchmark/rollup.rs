//! Grouping flat measure series into one series per entity.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::debug;

use crate::{
    data::measures::{MeasureMeta, MeasureRow, MeasureSeries, RollupKey},
    error::{EngineError, EngineResult},
    join::display_name,
};

use super::{chart_value, SeriesPoint};

/// Whether an entity is an organization or an aggregate (one measure seen
/// for a single organization, or a national total).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Organization,
    Aggregate,
}

/// Chronological rows of one entity on one measure, with the measure's
/// metadata copied alongside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySeries {
    pub id: String,
    pub name: Option<String>,
    pub kind: EntityKind,
    pub measure_id: String,
    #[serde(flatten)]
    pub meta: MeasureMeta,
    pub rows: Vec<MeasureRow>,
}

impl EntitySeries {
    pub fn display_name(&self) -> Option<String> {
        display_name(&self.id, self.name.as_deref())
    }

    /// `calc_value` per month on the chart scale of the measure.
    pub fn chart_points(&self) -> Vec<SeriesPoint> {
        self.rows
            .iter()
            .map(|row| SeriesPoint {
                month: row.date,
                value: row.calc_value.map(|value| chart_value(value, &self.meta)),
            })
            .collect()
    }
}

/// Dispatch on the grouping key. Organization rollups take a single measure.
pub fn roll_up(measures: &[MeasureSeries], key: RollupKey) -> EngineResult<Vec<EntitySeries>> {
    match key {
        RollupKey::Measure => Ok(roll_up_by_measure(measures)),
        RollupKey::Ccg | RollupKey::Practice => {
            let ids: IndexSet<&str> = measures.iter().map(|m| m.id.as_str()).collect();
            if ids.len() > 1 {
                return Err(EngineError::MixedMeasures {
                    rollup: key.percentile_key(),
                    count: ids.len(),
                });
            }
            let mut entities = Vec::new();
            for measure in measures {
                entities.extend(roll_up_by_org(measure, key)?);
            }
            Ok(entities)
        }
    }
}

/// Group one measure's rows by CCG or practice, in first-seen order.
pub fn roll_up_by_org(measure: &MeasureSeries, key: RollupKey) -> EngineResult<Vec<EntitySeries>> {
    if key == RollupKey::Measure {
        return Err(EngineError::UnhandledOrgType(key.to_string()));
    }

    let mut groups: IndexMap<String, EntitySeries> = IndexMap::new();
    for (index, row) in measure.data.iter().enumerate() {
        let id = row.org_id(key).ok_or_else(|| EngineError::MissingGroupKey {
            measure: measure.id.clone(),
            index,
            key: key.group_field(),
        })?;
        let entity = groups.entry(id.to_string()).or_insert_with(|| EntitySeries {
            id: id.to_string(),
            name: None,
            kind: EntityKind::Organization,
            measure_id: measure.id.clone(),
            meta: measure.meta.clone(),
            rows: Vec::new(),
        });
        if entity.name.is_none() {
            entity.name = row.org_name(key).map(str::to_string);
        }
        entity.rows.push(row.clone());
    }

    let entities: Vec<EntitySeries> = groups.into_values().map(chronological).collect();
    debug!(measure = %measure.id, %key, entities = entities.len(), "rolled up measure");
    Ok(entities)
}

/// One aggregate entity per measure, for a single organization's view across
/// many measures.
pub fn roll_up_by_measure(measures: &[MeasureSeries]) -> Vec<EntitySeries> {
    let mut groups: IndexMap<String, EntitySeries> = IndexMap::new();
    for measure in measures {
        let entity = groups
            .entry(measure.id.clone())
            .or_insert_with(|| EntitySeries {
                id: measure.id.clone(),
                name: measure.name.clone(),
                kind: EntityKind::Aggregate,
                measure_id: measure.id.clone(),
                meta: measure.meta.clone(),
                rows: Vec::new(),
            });
        entity.rows.extend(measure.data.iter().cloned());
    }
    groups.into_values().map(chronological).collect()
}

fn chronological(mut series: EntitySeries) -> EntitySeries {
    series.rows.sort_by_key(|row| row.date);
    series
}
