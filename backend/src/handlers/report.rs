//! HTTP handlers for financial report endpoints
//!
//! Every report supports `?format=csv` to download the breakdown rows.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{ApiResponse, AppResult};
use crate::services::report::{FinancialReport, ReportService};
use crate::AppState;

#[derive(Deserialize)]
pub struct DailyReportQuery {
    pub date: NaiveDate,
    pub format: Option<String>, // "json" or "csv"
}

#[derive(Deserialize)]
pub struct MonthlyReportQuery {
    pub year: i32,
    pub month: u32,
    pub format: Option<String>,
}

#[derive(Deserialize)]
pub struct YearlyReportQuery {
    pub year: i32,
    pub format: Option<String>,
}

#[derive(Deserialize)]
pub struct FinancialYearReportQuery {
    pub start_year: i32,
    pub format: Option<String>,
}

/// Report for a single day
pub async fn daily_report(
    State(state): State<AppState>,
    Query(query): Query<DailyReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportService::new(state.db);
    let report = service.daily_report(query.date).await?;
    render_report(report, query.format.as_deref(), "daily_report.csv")
}

/// Report for a calendar month with a per-day breakdown
pub async fn monthly_report(
    State(state): State<AppState>,
    Query(query): Query<MonthlyReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportService::new(state.db);
    let report = service.monthly_report(query.year, query.month).await?;
    render_report(report, query.format.as_deref(), "monthly_report.csv")
}

/// Report for a calendar year with a per-month breakdown
pub async fn yearly_report(
    State(state): State<AppState>,
    Query(query): Query<YearlyReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportService::new(state.db);
    let report = service.yearly_report(query.year).await?;
    render_report(report, query.format.as_deref(), "yearly_report.csv")
}

/// Report for an April-March financial year with a per-month breakdown
pub async fn financial_year_report(
    State(state): State<AppState>,
    Query(query): Query<FinancialYearReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportService::new(state.db);
    let report = service.financial_year_report(query.start_year).await?;
    render_report(report, query.format.as_deref(), "financial_year_report.csv")
}

/// Render a report as the JSON envelope or a CSV attachment
fn render_report(
    report: FinancialReport,
    format: Option<&str>,
    filename: &str,
) -> AppResult<axum::response::Response> {
    if format == Some("csv") {
        let csv = ReportService::export_to_csv(&report.breakdown)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(ApiResponse::ok(report).into_response())
    }
}
