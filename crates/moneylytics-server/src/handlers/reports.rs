//! Report handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{AppError, AppState};
use moneylytics_core::{PeriodReport, ReportPeriod};

/// GET /api/users/:id/reports/:period - Rendered report for today, week or month
///
/// An empty period is not an error: the text says so and `summary` is null.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path((id, period)): Path<(i64, String)>,
) -> Result<Json<PeriodReport>, AppError> {
    let period: ReportPeriod = period.parse().map_err(|e: String| AppError::bad_request(&e))?;

    let report = tokio::task::spawn_blocking(move || state.assistant.period_report(id, period))
        .await?
        .map_err(AppError::from_core)?;

    Ok(Json(report))
}
