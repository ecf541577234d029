//! Loading already-downloaded upstream payloads from disk.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use super::measures::{GlobalMeasure, MeasureSeries};

/// Read a JSON array of loosely shaped series rows.
pub fn read_rows(path: &Path) -> Result<Vec<Value>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let payload: Value =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    let Value::Array(rows) = payload else {
        bail!("{} does not hold a JSON array of rows", path.display());
    };
    info!(path = %path.display(), rows = rows.len(), "loaded series rows");
    Ok(rows)
}

pub fn read_measures(path: &Path) -> Result<Vec<MeasureSeries>> {
    let measures = read_payload::<MeasureSeries>(path)?;
    info!(path = %path.display(), measures = measures.len(), "loaded measures");
    Ok(measures)
}

pub fn read_global_measures(path: &Path) -> Result<Vec<GlobalMeasure>> {
    let measures = read_payload::<GlobalMeasure>(path)?;
    info!(path = %path.display(), measures = measures.len(), "loaded national measures");
    Ok(measures)
}

/// National reference data for `measure_id`, if any was supplied.
pub fn find_global<'a>(globals: &'a [GlobalMeasure], measure_id: &str) -> Option<&'a GlobalMeasure> {
    globals.iter().find(|global| global.id == measure_id)
}

/// Measure payloads arrive wrapped as `{"measures": [...]}`, as a bare array,
/// or as a single measure object.
fn read_payload<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let payload: Value =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    let parsed = match payload {
        Value::Object(mut object) if object.contains_key("measures") => {
            let measures = object.remove("measures").unwrap_or(Value::Null);
            serde_json::from_value(measures)
        }
        Value::Array(_) => serde_json::from_value(payload),
        single => serde_json::from_value(single).map(|measure| vec![measure]),
    };
    parsed.with_context(|| format!("decode measures in {}", path.display()))
}
