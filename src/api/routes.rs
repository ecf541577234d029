//! HTTP route handlers for Axum.

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::{
    api::types::{BenchmarkBody, CombineBody, HealthDto},
    benchmark::{self, centiles::KEY_CENTILES, BenchmarkReport, BenchmarkRequest},
    data::measures::RollupKey,
    error::EngineError,
    join::{self, selector::DenominatorSelector, CombinedRow},
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn combine(Json(body): Json<CombineBody>) -> ApiResult<Vec<CombinedRow>> {
    let selector: DenominatorSelector = body.denominator_field.parse().map_err(unprocessable)?;
    let rows = join::combine_values(&body.numerator, &body.denominator, &selector)
        .map_err(unprocessable)?;
    Ok(Json(rows))
}

pub async fn benchmark(
    State(state): State<AppState>,
    Json(body): Json<BenchmarkBody>,
) -> ApiResult<BenchmarkReport> {
    let rollup: RollupKey = body.org_type.parse().map_err(unprocessable)?;
    let request = BenchmarkRequest {
        measures: &body.measures,
        global: body.global.as_ref(),
        rollup,
        trailing_months: body.months.unwrap_or(state.settings.trailing_months),
        pinned_id: state.settings.pinned_id(),
        centile_labels: &KEY_CENTILES,
    };
    let report = benchmark::benchmark_report(&request).map_err(unprocessable)?;
    Ok(Json(report))
}

fn unprocessable(err: EngineError) -> (StatusCode, String) {
    warn!(%err, "rejected request");
    (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
}
