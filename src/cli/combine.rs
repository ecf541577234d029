//! CLI entry-point for joining two series into per-month ratios.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::{export, load},
    join::{self, selector::DenominatorSelector},
};

/// Args for the `combine` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Numerator series, a JSON array (relative paths resolve under DATA_DIR).
    #[arg(long)]
    pub numerator: PathBuf,
    /// Denominator series, a JSON array.
    #[arg(long)]
    pub denominator: PathBuf,
    /// `chemical`, `nothing`, a flat field such as `total_list_size`, or `group.metric`.
    #[arg(long, default_value = "total_list_size")]
    pub denominator_field: DenominatorSelector,
    /// Output file stem under OUTPUTS_DIR.
    #[arg(long, default_value = "combined")]
    pub output: String,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let numerator = load::read_rows(&settings.join_data(&args.numerator))?;
    let denominator = load::read_rows(&settings.join_data(&args.denominator))?;

    let rows = join::combine_values(&numerator, &denominator, &args.denominator_field)?;
    info!(rows = rows.len(), selector = %args.denominator_field, "combined series");

    export::write_json(&rows, &settings.join_output(format!("{}.json", args.output)))?;
    export::write_combined_csv(
        &rows,
        &args.denominator_field,
        &settings.join_output(format!("{}.csv", args.output)),
    )?;
    Ok(())
}
