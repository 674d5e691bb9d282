//! Dashboard handler: today's counters.

use axum::extract::State;
use axum::{Extension, Json};

use warung_core::report::DashboardReport;
use warung_core::types::Principal;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/v1/dashboard/today`
pub async fn today(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<DashboardReport>, ApiError> {
    let report = state.reports().dashboard_today(&principal).await?;
    Ok(Json(report))
}
