//! Request and response bodies for the JSON API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::measures::{GlobalMeasure, MeasureSeries};

/// Body of `POST /combine`.
#[derive(Debug, Clone, Deserialize)]
pub struct CombineBody {
    #[serde(default)]
    pub numerator: Vec<Value>,
    #[serde(default)]
    pub denominator: Vec<Value>,
    #[serde(default = "default_denominator_field")]
    pub denominator_field: String,
}

/// Body of `POST /benchmark`.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkBody {
    pub measures: Vec<MeasureSeries>,
    #[serde(default)]
    pub global: Option<GlobalMeasure>,
    #[serde(default = "default_org_type")]
    pub org_type: String,
    #[serde(default)]
    pub months: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub version: &'static str,
}

fn default_denominator_field() -> String {
    "total_list_size".to_string()
}

fn default_org_type() -> String {
    "ccg".to_string()
}
