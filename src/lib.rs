//! Comparative prescribing analytics.
//!
//! [`join`] merges a numerator and a denominator series per entity and month
//! and derives ratios; [`benchmark`] rolls measure series up per entity,
//! summarises recent percentiles and savings, and ranks worst-first against
//! national centiles.

pub mod api;
pub mod benchmark;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod join;
pub mod logging;

pub use error::{EngineError, EngineResult};
