//! Per-entity, per-month rows as delivered by the upstream prescribing API.
//!
//! Rows arrive as loosely shaped JSON objects. They are normalised here, once,
//! into [`TimeSeriesRow`] so the join engine never inspects raw keys.

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{EngineError, EngineResult};

/// Setting code of a standard prescribing practice.
pub const PRACTICE_SETTING: i32 = 4;

const ID_KEYS: &[&str] = &["row_id", "entity_id", "id"];
const NAME_KEYS: &[&str] = &["row_name", "entity_name", "name"];
const MONTH_KEYS: &[&str] = &["date", "month"];
const SETTING_KEY: &str = "setting";

/// A single measured quantity.
///
/// `Missing` is an explicit `null` from upstream; it is kept apart from zero
/// so ratios against it can stay unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "Option<f64>")]
pub enum FieldValue {
    Present(f64),
    Missing,
}

impl FieldValue {
    /// Coerce a JSON value. Returns `None` for values that are not
    /// measurements at all (text labels, booleans, arrays).
    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Missing),
            Value::Number(number) => Some(Self::Present(number.as_f64().unwrap_or(0.0))),
            Value::String(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|parsed| parsed.is_finite())
                .map(Self::Present),
            _ => None,
        }
    }

    /// Raw-field policy: a missing observation counts as zero activity.
    pub fn or_zero(self) -> f64 {
        match self {
            Self::Present(value) => value,
            Self::Missing => 0.0,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<FieldValue> for Option<f64> {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Present(v) => Some(v),
            FieldValue::Missing => None,
        }
    }
}

/// Flat fields plus named groups of sub-metrics (e.g. `star_pu`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Measurements {
    #[serde(flatten)]
    pub fields: IndexMap<String, FieldValue>,
    #[serde(flatten)]
    pub groups: IndexMap<String, IndexMap<String, FieldValue>>,
}

impl Measurements {
    /// Read a flat field; absent fields read as zero.
    pub fn field(&self, name: &str) -> FieldValue {
        self.fields
            .get(name)
            .copied()
            .unwrap_or(FieldValue::Present(0.0))
    }

    /// Read `group.metric`; an absent group or metric reads as zero.
    pub fn nested(&self, group: &str, metric: &str) -> FieldValue {
        self.groups
            .get(group)
            .and_then(|metrics| metrics.get(metric))
            .copied()
            .unwrap_or(FieldValue::Present(0.0))
    }

    /// Record every key of `row` in this schema, zero valued.
    pub fn absorb_schema(&mut self, row: &Measurements) {
        for name in row.fields.keys() {
            self.fields
                .entry(name.clone())
                .or_insert(FieldValue::Present(0.0));
        }
        for (group, metrics) in &row.groups {
            let target = self.groups.entry(group.clone()).or_default();
            for metric in metrics.keys() {
                target
                    .entry(metric.clone())
                    .or_insert(FieldValue::Present(0.0));
            }
        }
    }

    /// Copy of the schema with every value set to zero.
    pub fn zeroed(&self) -> Self {
        Self {
            fields: self
                .fields
                .keys()
                .map(|name| (name.clone(), FieldValue::Present(0.0)))
                .collect(),
            groups: self
                .groups
                .iter()
                .map(|(group, metrics)| {
                    let zeroes = metrics
                        .keys()
                        .map(|metric| (metric.clone(), FieldValue::Present(0.0)))
                        .collect();
                    (group.clone(), zeroes)
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.groups.is_empty()
    }
}

/// One observation for one entity in one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesRow {
    pub entity_id: String,
    pub entity_name: Option<String>,
    pub month: NaiveDate,
    pub setting: Option<i32>,
    pub measurements: Measurements,
}

impl TimeSeriesRow {
    /// Normalise one upstream JSON object. `index` is only used for errors.
    pub fn from_value(index: usize, value: &Value) -> EngineResult<Self> {
        let object = value
            .as_object()
            .ok_or(EngineError::NotAnObject { index })?;

        let entity_id = first_of(object, ID_KEYS)
            .and_then(text_of)
            .ok_or(EngineError::MissingEntityId { index })?;
        let entity_name = first_of(object, NAME_KEYS).and_then(text_of);
        let raw_month = first_of(object, MONTH_KEYS)
            .and_then(Value::as_str)
            .ok_or(EngineError::MissingMonth { index })?;
        let month = parse_month(index, raw_month)?;
        let setting = match object.get(SETTING_KEY) {
            None | Some(Value::Null) => None,
            Some(raw) => Some(setting_of(raw).ok_or_else(|| EngineError::InvalidSetting {
                index,
                value: raw.to_string(),
            })?),
        };

        let mut measurements = Measurements::default();
        for (key, raw) in object {
            if is_reserved(key) {
                continue;
            }
            match raw {
                Value::Object(nested) => {
                    let metrics: IndexMap<String, FieldValue> = nested
                        .iter()
                        .filter_map(|(metric, v)| FieldValue::parse(v).map(|fv| (metric.clone(), fv)))
                        .collect();
                    measurements.groups.insert(key.clone(), metrics);
                }
                other => {
                    if let Some(parsed) = FieldValue::parse(other) {
                        measurements.fields.insert(key.clone(), parsed);
                    }
                }
            }
        }

        Ok(Self {
            entity_id,
            entity_name,
            month,
            setting,
            measurements,
        })
    }
}

/// Normalise a whole upstream array, failing on the first malformed row.
pub fn parse_rows(values: &[Value]) -> EngineResult<Vec<TimeSeriesRow>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| TimeSeriesRow::from_value(index, value))
        .collect()
}

/// Parse an ISO `YYYY-MM-DD` value and snap it to the first of its month.
pub fn parse_month(index: usize, raw: &str) -> EngineResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|source| {
        EngineError::InvalidMonth {
            index,
            value: raw.to_string(),
            source,
        }
    })?;
    Ok(date.with_day(1).unwrap_or(date))
}

fn first_of<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Whole-number classification code; `3.0` and `"3"` both read as 3.
fn setting_of(value: &Value) -> Option<i32> {
    let code = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if code.fract() != 0.0 || code < f64::from(i32::MIN) || code > f64::from(i32::MAX) {
        return None;
    }
    Some(code as i32)
}

fn is_reserved(key: &str) -> bool {
    key == SETTING_KEY
        || ID_KEYS.contains(&key)
        || NAME_KEYS.contains(&key)
        || MONTH_KEYS.contains(&key)
}
