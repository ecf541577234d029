//! CLI entry-point for ranking organizations against national centiles.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument, warn};

use crate::{
    benchmark::{self, centiles::KEY_CENTILES, BenchmarkRequest},
    config::Settings,
    data::{export, load, measures::RollupKey},
};

/// Args for the `benchmark` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Measure payload with per-organization rows.
    #[arg(long)]
    pub measures: PathBuf,
    /// National reference payload holding the centile series.
    #[arg(long)]
    pub global: Option<PathBuf>,
    /// Grouping: `ccg`, `practice` or `measure`.
    #[arg(long, default_value = "ccg")]
    pub org_type: RollupKey,
    /// Override the trailing window length in months.
    #[arg(long)]
    pub months: Option<usize>,
    /// Output file stem under OUTPUTS_DIR.
    #[arg(long, default_value = "benchmark")]
    pub output: String,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let measures = load::read_measures(&settings.join_data(&args.measures))?;
    let globals = match &args.global {
        Some(path) => load::read_global_measures(&settings.join_data(path))?,
        None => Vec::new(),
    };
    let global = measures
        .first()
        .and_then(|measure| load::find_global(&globals, &measure.id));
    if args.global.is_some() && global.is_none() {
        warn!("no national data for the requested measure; centiles left empty");
    }

    let request = BenchmarkRequest {
        measures: &measures,
        global,
        rollup: args.org_type,
        trailing_months: args.months.unwrap_or(settings.trailing_months),
        pinned_id: settings.pinned_id(),
        centile_labels: &KEY_CENTILES,
    };
    let report = benchmark::benchmark_report(&request)?;
    info!(
        entities = report.entities.len(),
        worse_than_median = report.performance.worse_than_median,
        "benchmarked organizations"
    );

    export::write_json(&report, &settings.join_output(format!("{}.json", args.output)))?;
    export::write_benchmark_csv(
        &report.entities,
        &settings.join_output(format!("{}.csv", args.output)),
    )?;
    Ok(())
}
