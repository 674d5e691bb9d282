//! # Report Service
//!
//! Fetches day-key-filtered ledger ranges and runs the pure aggregation
//! from `warung_core::report`. Nothing is cached: every request recomputes
//! against the ledger as of the read.
//!
//! Owner gating: summary and export require the owner role; the daily
//! audit view and the dashboard are available to all staff.

use chrono::Utc;
use serde::Serialize;

use warung_core::report::{
    self, DailyDetailReport, DashboardReport, ExportRow, SummaryReport,
};
use warung_core::sequence::{business_day, day_key, day_key_from_date_str};
use warung_core::types::Principal;
use warung_core::{format as report_format, CoreError};
use warung_db::Database;

use crate::error::ApiError;

/// Export payload in either of the supported formats.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExportPayload {
    Structured {
        format: &'static str,
        period: report::ReportPeriod,
        total_records: usize,
        data: Vec<ExportRow>,
    },
    Delimited {
        format: &'static str,
        filename: String,
        data: String,
    },
}

/// Orchestrates report reads over the repositories.
#[derive(Clone)]
pub struct ReportService {
    db: Database,
}

impl ReportService {
    pub fn new(db: Database) -> Self {
        ReportService { db }
    }

    /// Range summary. Owner only. Dates default to the current UTC day;
    /// a missing end date collapses the range onto the start date.
    pub async fn summary(
        &self,
        principal: &Principal,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<SummaryReport, ApiError> {
        principal.require_owner()?;

        let (period, start_key, end_key) = resolve_range(start_date, end_date)?;
        let transactions = self
            .db
            .transactions()
            .fetch_day_range(&principal.tenant_id, &start_key, &end_key)
            .await?;

        Ok(report::summarize(period, &transactions))
    }

    /// Single-day audit view, voided transactions included. All staff.
    pub async fn daily(
        &self,
        principal: &Principal,
        date: Option<&str>,
    ) -> Result<DailyDetailReport, ApiError> {
        let (date, key) = resolve_day(date)?;
        let transactions = self
            .db
            .transactions()
            .fetch_day_range(&principal.tenant_id, &key, &key)
            .await?;

        Ok(report::daily_detail(date, transactions))
    }

    /// Today's dashboard, pinned to the current UTC day. All staff.
    pub async fn dashboard_today(&self, principal: &Principal) -> Result<DashboardReport, ApiError> {
        let today = business_day(Utc::now());
        let key = day_key(today);
        let transactions = self
            .db
            .transactions()
            .fetch_day_range(&principal.tenant_id, &key, &key)
            .await?;

        Ok(report::dashboard(
            today.format("%Y-%m-%d").to_string(),
            &transactions,
        ))
    }

    /// Flattened export of a range, voided rows included. Owner only.
    pub async fn export(
        &self,
        principal: &Principal,
        start_date: Option<&str>,
        end_date: Option<&str>,
        delimited: bool,
    ) -> Result<ExportPayload, ApiError> {
        principal.require_owner()?;

        let (period, start_key, end_key) = resolve_range(start_date, end_date)?;
        let transactions = self
            .db
            .transactions()
            .fetch_day_range(&principal.tenant_id, &start_key, &end_key)
            .await?;

        let mut rows = report::export_rows(&transactions);
        // Exports read naturally in issue order.
        rows.sort_by(|a, b| a.transaction_number.cmp(&b.transaction_number));

        if delimited {
            Ok(ExportPayload::Delimited {
                format: "csv",
                filename: format!(
                    "laporan_{}_to_{}.csv",
                    period.start_date, period.end_date
                ),
                data: report_format::render_delimited(&rows),
            })
        } else {
            Ok(ExportPayload::Structured {
                format: "json",
                period,
                total_records: rows.len(),
                data: rows,
            })
        }
    }
}

// =============================================================================
// Range Resolution
// =============================================================================

/// Resolves optional `YYYY-MM-DD` bounds into a period plus day keys.
/// Both bounds default to today; a missing end date mirrors the start.
fn resolve_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<(report::ReportPeriod, String, String), ApiError> {
    let today = business_day(Utc::now()).format("%Y-%m-%d").to_string();
    let start = start_date.unwrap_or(&today).to_string();
    let end = end_date.unwrap_or(&start).to_string();

    let start_key = day_key_from_date_str(&start).map_err(CoreError::from)?;
    let end_key = day_key_from_date_str(&end).map_err(CoreError::from)?;

    Ok((
        report::ReportPeriod {
            start_date: start,
            end_date: end,
        },
        start_key,
        end_key,
    ))
}

fn resolve_day(date: Option<&str>) -> Result<(String, String), ApiError> {
    let today = business_day(Utc::now()).format("%Y-%m-%d").to_string();
    let date = date.unwrap_or(&today).to_string();
    let key = day_key_from_date_str(&date).map_err(CoreError::from)?;
    Ok((date, key))
}

// =============================================================================
// Service Tests
// =============================================================================
