//! Report handlers: summary, daily detail, export.

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use warung_core::report::{DailyDetailReport, SummaryReport};
use warung_core::types::Principal;

use crate::error::ApiError;
use crate::services::reports::ExportPayload;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// `json` (default) or `csv`.
    pub format: Option<String>,
}

/// `GET /api/v1/reports/summary` - owner only.
pub async fn summary(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<SummaryReport>, ApiError> {
    let report = state
        .reports()
        .summary(
            &principal,
            query.start_date.as_deref(),
            query.end_date.as_deref(),
        )
        .await?;

    Ok(Json(report))
}

/// `GET /api/v1/reports/daily`
pub async fn daily(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<DailyDetailReport>, ApiError> {
    let report = state
        .reports()
        .daily(&principal, query.date.as_deref())
        .await?;

    Ok(Json(report))
}

/// `GET /api/v1/reports/export` - owner only.
pub async fn export(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<ExportPayload>, ApiError> {
    let delimited = match query.format.as_deref() {
        None | Some("json") => false,
        Some("csv") => true,
        Some(other) => {
            return Err(ApiError::invalid_argument(format!(
                "Unknown export format: {other}"
            )))
        }
    };

    let payload = state
        .reports()
        .export(
            &principal,
            query.start_date.as_deref(),
            query.end_date.as_deref(),
            delimited,
        )
        .await?;

    Ok(Json(payload))
}
