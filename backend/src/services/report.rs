//! Financial reporting service
//!
//! Each report fetches the raw rows for its whole window once, then derives
//! the totals and the per-sub-period breakdown by re-filtering the same
//! in-memory sets. Nothing is aggregated incrementally.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::models::report::{
    summarize, ExpenditureFigure, PurchaseFigure, ReportRange, ReportTotals, SaleFigure,
};
use shared::validation::{validate_month, validate_year};

/// Reporting service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

/// A finished report for one window
#[derive(Debug, Serialize)]
pub struct FinancialReport {
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub totals: ReportTotals,
    pub breakdown: Vec<BreakdownRow>,
}

/// One sub-period of a report, flattened for JSON and CSV alike
#[derive(Debug, Serialize)]
pub struct BreakdownRow {
    pub label: String,
    pub total_sales: Decimal,
    pub total_expenditures: Decimal,
    pub total_purchases: Decimal,
    pub remaining_supplier_amount: Decimal,
    pub remaining_customer_amount: Decimal,
    pub profit: Decimal,
}

impl BreakdownRow {
    fn new(label: String, totals: ReportTotals) -> Self {
        Self {
            label,
            total_sales: totals.total_sales,
            total_expenditures: totals.total_expenditures,
            total_purchases: totals.total_purchases,
            remaining_supplier_amount: totals.remaining_supplier_amount,
            remaining_customer_amount: totals.remaining_customer_amount,
            profit: totals.profit,
        }
    }
}

/// Raw figures fetched once per report window
struct WindowFigures {
    sales: Vec<SaleFigure>,
    purchases: Vec<PurchaseFigure>,
    expenditures: Vec<ExpenditureFigure>,
}

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Report for a single calendar day
    pub async fn daily_report(&self, date: NaiveDate) -> AppResult<FinancialReport> {
        let range = ReportRange::single_day(date);
        let figures = self.fetch_window(&range).await?;
        let totals = summarize(&range, &figures.sales, &figures.purchases, &figures.expenditures);

        Ok(FinancialReport {
            label: date.to_string(),
            start_date: range.start,
            end_date: range.end,
            breakdown: vec![BreakdownRow::new(date.to_string(), totals.clone())],
            totals,
        })
    }

    /// Report for one calendar month with a per-day breakdown
    pub async fn monthly_report(&self, year: i32, month: u32) -> AppResult<FinancialReport> {
        validate_year(year).map_err(|msg| AppError::validation("year", msg))?;
        validate_month(month).map_err(|msg| AppError::validation("month", msg))?;
        let range = ReportRange::calendar_month(year, month)
            .ok_or_else(|| AppError::validation("month", "Month must be between 1 and 12"))?;

        let figures = self.fetch_window(&range).await?;
        let totals = summarize(&range, &figures.sales, &figures.purchases, &figures.expenditures);

        let breakdown = range
            .days()
            .into_iter()
            .map(|day| {
                let day_range = ReportRange::single_day(day);
                let day_totals = summarize(
                    &day_range,
                    &figures.sales,
                    &figures.purchases,
                    &figures.expenditures,
                );
                BreakdownRow::new(day.to_string(), day_totals)
            })
            .collect();

        Ok(FinancialReport {
            label: format!("{:04}-{:02}", year, month),
            start_date: range.start,
            end_date: range.end,
            totals,
            breakdown,
        })
    }

    /// Report for one calendar year with a per-month breakdown
    pub async fn yearly_report(&self, year: i32) -> AppResult<FinancialReport> {
        validate_year(year).map_err(|msg| AppError::validation("year", msg))?;
        let range = ReportRange::calendar_year(year);

        let figures = self.fetch_window(&range).await?;
        let totals = summarize(&range, &figures.sales, &figures.purchases, &figures.expenditures);
        let breakdown = Self::monthly_breakdown(&range, &figures);

        Ok(FinancialReport {
            label: format!("{:04}", year),
            start_date: range.start,
            end_date: range.end,
            totals,
            breakdown,
        })
    }

    /// Report for one April-March financial year with a per-month breakdown
    pub async fn financial_year_report(&self, start_year: i32) -> AppResult<FinancialReport> {
        validate_year(start_year).map_err(|msg| AppError::validation("financial_year", msg))?;
        let range = ReportRange::financial_year(start_year);

        let figures = self.fetch_window(&range).await?;
        let totals = summarize(&range, &figures.sales, &figures.purchases, &figures.expenditures);
        let breakdown = Self::monthly_breakdown(&range, &figures);

        Ok(FinancialReport {
            label: format!("FY {}-{:02}", start_year, (start_year + 1) % 100),
            start_date: range.start,
            end_date: range.end,
            totals,
            breakdown,
        })
    }

    /// Export report breakdown rows as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            crate::error::AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }

    /// One breakdown row per month the range touches
    fn monthly_breakdown(range: &ReportRange, figures: &WindowFigures) -> Vec<BreakdownRow> {
        range
            .months()
            .into_iter()
            .filter_map(|(year, month)| ReportRange::calendar_month(year, month))
            .map(|month_range| {
                let month_totals = summarize(
                    &month_range,
                    &figures.sales,
                    &figures.purchases,
                    &figures.expenditures,
                );
                let label = month_range.start.format("%Y-%m").to_string();
                BreakdownRow::new(label, month_totals)
            })
            .collect()
    }

    /// Fetch the raw figures for a report window
    async fn fetch_window(&self, range: &ReportRange) -> AppResult<WindowFigures> {
        let sales = sqlx::query_as::<_, (Decimal, Decimal, NaiveDate)>(
            "SELECT total_amount, balance_amount, sale_date FROM sales WHERE sale_date BETWEEN $1 AND $2",
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|(total_amount, balance_amount, sale_date)| SaleFigure {
            total_amount,
            balance_amount,
            sale_date,
        })
        .collect();

        let purchases = sqlx::query_as::<_, (Decimal, Decimal, NaiveDate)>(
            "SELECT total_amount, paid_amount, purchase_date FROM purchases WHERE purchase_date BETWEEN $1 AND $2",
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|(total_amount, paid_amount, purchase_date)| PurchaseFigure {
            total_amount,
            paid_amount,
            purchase_date,
        })
        .collect();

        let expenditures = sqlx::query_as::<_, (Decimal, NaiveDate)>(
            "SELECT amount, spent_on FROM expenditures WHERE spent_on BETWEEN $1 AND $2",
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|(amount, spent_on)| ExpenditureFigure { amount, spent_on })
        .collect();

        Ok(WindowFigures {
            sales,
            purchases,
            expenditures,
        })
    }
}
