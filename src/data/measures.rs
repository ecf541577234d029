//! Typed measure series: per-organization values, percentiles and savings.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Savings keyed by percentile label (`"10"`, `"50"`, ...).
pub type CostSavings = IndexMap<String, Option<f64>>;

/// Descriptive flags of a measure.
///
/// Upstream payloads spell these either in snake case or camel case; both are
/// accepted here and nothing downstream sees the difference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureMeta {
    #[serde(default, alias = "isPercentage")]
    pub is_percentage: bool,
    #[serde(default, alias = "isCostBased")]
    pub is_cost_based: bool,
    /// `None` when the measure has no declared polarity.
    #[serde(default, alias = "lowIsGood")]
    pub low_is_good: Option<bool>,
    #[serde(default, alias = "numeratorShort")]
    pub numerator_short: Option<String>,
    #[serde(default, alias = "denominatorShort")]
    pub denominator_short: Option<String>,
}

/// One month of one organization's value on a measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureRow {
    #[serde(alias = "month")]
    pub date: NaiveDate,
    #[serde(default)]
    pub numerator: Option<f64>,
    #[serde(default)]
    pub denominator: Option<f64>,
    #[serde(default)]
    pub calc_value: Option<f64>,
    #[serde(default)]
    pub percentile: Option<f64>,
    #[serde(default)]
    pub cost_savings: Option<CostSavings>,
    #[serde(default)]
    pub pct_id: Option<String>,
    #[serde(default)]
    pub pct_name: Option<String>,
    #[serde(default)]
    pub practice_id: Option<String>,
    #[serde(default)]
    pub practice_name: Option<String>,
}

impl MeasureRow {
    /// Saving against the given percentile label; `None` when the row has no
    /// savings record or the label is null.
    pub fn saving_at(&self, label: &str) -> Option<f64> {
        self.cost_savings
            .as_ref()
            .and_then(|savings| savings.get(label).copied().flatten())
    }

    /// Organization identifier for the given grouping; measure grouping has
    /// no per-row organization.
    pub fn org_id(&self, key: RollupKey) -> Option<&str> {
        let id = match key {
            RollupKey::Ccg => self.pct_id.as_deref(),
            RollupKey::Practice => self.practice_id.as_deref(),
            RollupKey::Measure => None,
        };
        id.filter(|id| !id.trim().is_empty())
    }

    pub fn org_name(&self, key: RollupKey) -> Option<&str> {
        match key {
            RollupKey::Ccg => self.pct_name.as_deref(),
            RollupKey::Practice => self.practice_name.as_deref(),
            RollupKey::Measure => None,
        }
    }
}

/// A measure with its definition and a flat row-per-org-per-month series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureSeries {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub meta: MeasureMeta,
    #[serde(default)]
    pub data: Vec<MeasureRow>,
}

/// National reference data for one measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMeasure {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub meta: MeasureMeta,
    #[serde(default)]
    pub data: Vec<GlobalRow>,
}

/// One month of national percentiles, keyed by organization type then label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalRow {
    #[serde(alias = "month")]
    pub date: NaiveDate,
    #[serde(default)]
    pub percentiles: IndexMap<String, IndexMap<String, Option<f64>>>,
}

impl GlobalRow {
    pub fn centile(&self, org_key: &str, label: &str) -> Option<f64> {
        self.percentiles
            .get(org_key)
            .and_then(|labels| labels.get(label).copied().flatten())
    }
}

/// What a flat measure series is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollupKey {
    Ccg,
    Practice,
    /// One organization across several measures.
    Measure,
}

impl RollupKey {
    /// Key used for this organization type in national percentile payloads.
    pub fn percentile_key(self) -> &'static str {
        match self {
            Self::Ccg => "ccg",
            Self::Practice => "practice",
            Self::Measure => "measure",
        }
    }

    /// Row field holding the grouping identifier.
    pub fn group_field(self) -> &'static str {
        match self {
            Self::Ccg => "pct_id",
            Self::Practice => "practice_id",
            Self::Measure => "measure_id",
        }
    }
}

impl FromStr for RollupKey {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ccg" | "pct" => Ok(Self::Ccg),
            "practice" => Ok(Self::Practice),
            "measure" | "measure_id" => Ok(Self::Measure),
            _ => Err(EngineError::UnhandledOrgType(raw.to_string())),
        }
    }
}

impl fmt::Display for RollupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.percentile_key())
    }
}
