//! Which denominator field a comparison divides by.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    data::rows::{FieldValue, Measurements},
    error::EngineError,
};

/// The two standard ratio families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioFamily {
    Items,
    ActualCost,
}

impl RatioFamily {
    pub const ALL: [RatioFamily; 2] = [RatioFamily::Items, RatioFamily::ActualCost];

    /// Raw spending field the family reads from either side.
    pub fn field(self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::ActualCost => "actual_cost",
        }
    }
}

/// Multiplier applied to `numerator / denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioScale {
    /// Per 1000 units of denominator.
    PerThousand,
    /// Raw quotient.
    Unscaled,
}

impl RatioScale {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::PerThousand => 1000.0,
            Self::Unscaled => 1.0,
        }
    }
}

/// Closed set of denominator addressing modes.
///
/// Parsed from the string form used by callers (`"chemical"`, `"nothing"`,
/// `"total_list_size"`, `"star_pu.oral_antibacterials_item"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DenominatorSelector {
    /// Another spending dataset: items over items, cost over cost.
    Spending,
    /// A flat field such as `total_list_size`.
    Field(String),
    /// A sub-metric inside a nested group, `group.metric`.
    Nested { group: String, metric: String },
    /// No denominator: unit value and no per-thousand scaling.
    Nothing,
}

impl DenominatorSelector {
    /// Resolve the denominator value for `family` from one row's measurements.
    pub fn resolve(&self, family: RatioFamily, denominator: &Measurements) -> FieldValue {
        match self {
            Self::Spending => denominator.field(family.field()),
            Self::Field(name) => denominator.field(name),
            Self::Nested { group, metric } => denominator.nested(group, metric),
            Self::Nothing => FieldValue::Present(1.0),
        }
    }

    pub fn scale(&self) -> RatioScale {
        match self {
            Self::Nothing => RatioScale::Unscaled,
            _ => RatioScale::PerThousand,
        }
    }
}

impl FromStr for DenominatorSelector {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        match trimmed {
            "" => Err(EngineError::InvalidSelector(raw.to_string())),
            "chemical" | "spending" => Ok(Self::Spending),
            "nothing" => Ok(Self::Nothing),
            path if path.contains('.') => {
                let mut parts = path.split('.');
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(group), Some(metric), None) if !group.is_empty() && !metric.is_empty() => {
                        Ok(Self::Nested {
                            group: group.to_string(),
                            metric: metric.to_string(),
                        })
                    }
                    _ => Err(EngineError::InvalidSelector(raw.to_string())),
                }
            }
            field => Ok(Self::Field(field.to_string())),
        }
    }
}

impl TryFrom<String> for DenominatorSelector {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DenominatorSelector> for String {
    fn from(value: DenominatorSelector) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DenominatorSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spending => f.write_str("chemical"),
            Self::Field(name) => f.write_str(name),
            Self::Nested { group, metric } => write!(f, "{group}.{metric}"),
            Self::Nothing => f.write_str("nothing"),
        }
    }
}
