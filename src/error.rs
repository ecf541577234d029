//! Error taxonomy for the comparison engine.

use thiserror::Error;

/// Failures surfaced by the join and benchmark engines.
///
/// Shape and parsing problems fail fast; "no data" conditions are not errors
/// and degrade to empty results instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("row {index}: invalid month value {value:?}")]
    InvalidMonth {
        index: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("row {index}: missing `date`/`month` field")]
    MissingMonth { index: usize },

    #[error("row {index}: missing entity identifier")]
    MissingEntityId { index: usize },

    #[error("row {index}: setting {value} is not a whole number")]
    InvalidSetting { index: usize, value: String },

    #[error("row {index}: expected a JSON object")]
    NotAnObject { index: usize },

    #[error("unhandled organization type: {0}")]
    UnhandledOrgType(String),

    #[error("measure {measure}: row {index} has no `{key}` to group by")]
    MissingGroupKey {
        measure: String,
        index: usize,
        key: &'static str,
    },

    #[error("{rollup} rollup spans {count} measures; organizations are ranked one measure at a time")]
    MixedMeasures { rollup: &'static str, count: usize },

    #[error("invalid denominator selector: {0:?}")]
    InvalidSelector(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
