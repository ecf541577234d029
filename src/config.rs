//! Runtime configuration utilities for rx-benchmark.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

use crate::benchmark::{sort::DEFAULT_PINNED_AGGREGATE, summary::DEFAULT_TRAILING_MONTHS};

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root folder holding downloaded input series.
    pub data_dir: PathBuf,
    /// Root folder for computed outputs.
    pub outputs_dir: PathBuf,
    /// Months of recent history used for summaries.
    pub trailing_months: usize,
    /// Aggregate pinned to the top of measure listings.
    pub pinned_aggregate_id: Option<String>,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));
        let trailing_months = env::var("TRAILING_MONTHS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TRAILING_MONTHS);
        // An empty value switches pinning off.
        let pinned_aggregate_id = match env::var("PINNED_AGGREGATE_ID") {
            Ok(id) if id.trim().is_empty() => None,
            Ok(id) => Some(id.trim().to_string()),
            Err(_) => Some(DEFAULT_PINNED_AGGREGATE.to_string()),
        };

        std::fs::create_dir_all(&data_dir).context("creating data dir")?;
        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            data_dir,
            outputs_dir,
            trailing_months,
            pinned_aggregate_id,
        })
    }

    /// Convenience helper for derived path segments.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }

    pub fn pinned_id(&self) -> Option<&str> {
        self.pinned_aggregate_id.as_deref()
    }
}
