//! Writing engine outputs for downstream charting and tabular consumers.

use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, NamedFrom, SerWriter, Series};
use serde::Serialize;
use tracing::info;

use crate::{
    benchmark::BenchmarkedEntity,
    join::{
        selector::{DenominatorSelector, RatioFamily},
        CombinedRow,
    },
};

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    info!(path = %path.display(), "wrote json output");
    Ok(())
}

/// One flat line per combined row; null and unset ratios both become empty
/// cells. No rows still writes the header.
pub fn write_combined_csv(
    rows: &[CombinedRow],
    selector: &DenominatorSelector,
    path: &Path,
) -> Result<()> {
    let denominator = |family: RatioFamily| -> Vec<Option<f64>> {
        rows.iter()
            .map(|r| Option::<f64>::from(selector.resolve(family, &r.denominator)))
            .collect()
    };
    let mut df = DataFrame::new(vec![
        Series::new(
            "entity_id".into(),
            rows.iter().map(|r| r.entity_id.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "display_name".into(),
            rows.iter().map(|r| r.display_name.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "month".into(),
            rows.iter().map(|r| r.month.to_string()).collect::<Vec<_>>(),
        ),
        Series::new(
            "setting".into(),
            rows.iter().map(|r| r.setting).collect::<Vec<_>>(),
        ),
        Series::new(
            "numerator_items".into(),
            rows.iter()
                .map(|r| r.numerator_value(RatioFamily::Items))
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "numerator_actual_cost".into(),
            rows.iter()
                .map(|r| r.numerator_value(RatioFamily::ActualCost))
                .collect::<Vec<_>>(),
        ),
        Series::new("denominator_items".into(), denominator(RatioFamily::Items)),
        Series::new(
            "denominator_actual_cost".into(),
            denominator(RatioFamily::ActualCost),
        ),
        Series::new(
            "ratio_items".into(),
            rows.iter()
                .map(|r| r.ratio_items.flatten())
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "ratio_actual_cost".into(),
            rows.iter()
                .map(|r| r.ratio_actual_cost.flatten())
                .collect::<Vec<_>>(),
        ),
    ])?;
    write_frame(&mut df, path)
}

pub fn write_benchmark_csv(entities: &[BenchmarkedEntity], path: &Path) -> Result<()> {
    let summaries: Vec<_> = entities.iter().map(|e| &e.summary).collect();
    let mut df = DataFrame::new(vec![
        Series::new(
            "entity_id".into(),
            summaries
                .iter()
                .map(|s| s.entity_id.clone())
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "display_name".into(),
            summaries
                .iter()
                .map(|s| s.display_name.clone())
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "measure_id".into(),
            summaries
                .iter()
                .map(|s| s.measure_id.clone())
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "months".into(),
            summaries.iter().map(|s| s.months as u64).collect::<Vec<_>>(),
        ),
        Series::new(
            "mean_percentile".into(),
            summaries
                .iter()
                .map(|s| s.mean_percentile)
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "cost_saving_50th".into(),
            summaries
                .iter()
                .map(|s| s.cost_saving_50th)
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "cost_saving_10th".into(),
            summaries
                .iter()
                .map(|s| s.cost_saving_10th)
                .collect::<Vec<_>>(),
        ),
    ])?;
    write_frame(&mut df, path)
}

fn write_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file).finish(df)?;
    info!(path = %path.display(), rows = df.height(), "wrote csv output");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
