//! Report period arithmetic and financial totals
//!
//! Reports re-derive their figures from raw sale, purchase, and expenditure
//! rows fetched for the whole window; breakdowns re-filter the same
//! in-memory sets per sub-period. The financial year runs April 1 through
//! March 31, Indian tax-year style.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An inclusive date window a report aggregates over
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportRange {
    /// A single calendar day
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// One calendar month; `None` for an invalid month number
    pub fn calendar_month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = last_day_of_month(year, month)?;
        Some(Self { start, end })
    }

    /// One calendar year, January 1 through December 31
    pub fn calendar_year(year: i32) -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1).expect("January 1 is always valid"),
            end: NaiveDate::from_ymd_opt(year, 12, 31).expect("December 31 is always valid"),
        }
    }

    /// The financial year starting April 1 of `start_year` and ending
    /// March 31 of the following year
    pub fn financial_year(start_year: i32) -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(start_year, 4, 1).expect("April 1 is always valid"),
            end: NaiveDate::from_ymd_opt(start_year + 1, 3, 31).expect("March 31 is always valid"),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Every day in the window, in order
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .collect()
    }

    /// Every (year, month) the window touches, in order
    pub fn months(&self) -> Vec<(i32, u32)> {
        let mut months = Vec::new();
        let mut year = self.start.year();
        let mut month = self.start.month();
        loop {
            months.push((year, month));
            if year == self.end.year() && month == self.end.month() {
                break;
            }
            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
        }
        months
    }
}

/// Last day of a calendar month
fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }?;
    first_of_next.pred_opt()
}

/// The financial year a date falls in: January–March belong to the
/// previous year's financial year
pub fn financial_year_of(date: NaiveDate) -> i32 {
    if date.month() >= 4 {
        date.year()
    } else {
        date.year() - 1
    }
}

/// Sale figures a report needs
#[derive(Debug, Clone, Serialize)]
pub struct SaleFigure {
    pub total_amount: Decimal,
    pub balance_amount: Decimal,
    pub sale_date: NaiveDate,
}

impl SaleFigure {
    /// Amount actually collected from the customer so far
    pub fn collected(&self) -> Decimal {
        self.total_amount - self.balance_amount
    }
}

/// Purchase figures a report needs
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseFigure {
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub purchase_date: NaiveDate,
}

impl PurchaseFigure {
    pub fn outstanding(&self) -> Decimal {
        self.total_amount - self.paid_amount
    }
}

/// Expenditure figures a report needs
#[derive(Debug, Clone, Serialize)]
pub struct ExpenditureFigure {
    pub amount: Decimal,
    pub spent_on: NaiveDate,
}

/// Derived totals for one report window
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReportTotals {
    /// Collected from customers: sum of (total - balance) per sale
    pub total_sales: Decimal,
    pub total_expenditures: Decimal,
    /// Paid out to suppliers: sum of paid_amount per purchase
    pub total_purchases: Decimal,
    /// Still owed to suppliers: sum of (total - paid) per purchase
    pub remaining_supplier_amount: Decimal,
    /// Still owed by customers: sum of balance per sale
    pub remaining_customer_amount: Decimal,
    /// total_sales - total_expenditures - total_purchases
    pub profit: Decimal,
}

impl ReportTotals {
    pub fn zero() -> Self {
        Self {
            total_sales: Decimal::ZERO,
            total_expenditures: Decimal::ZERO,
            total_purchases: Decimal::ZERO,
            remaining_supplier_amount: Decimal::ZERO,
            remaining_customer_amount: Decimal::ZERO,
            profit: Decimal::ZERO,
        }
    }
}

/// Fold the figures falling inside `range` into report totals
pub fn summarize(
    range: &ReportRange,
    sales: &[SaleFigure],
    purchases: &[PurchaseFigure],
    expenditures: &[ExpenditureFigure],
) -> ReportTotals {
    let mut totals = ReportTotals::zero();

    for sale in sales.iter().filter(|s| range.contains(s.sale_date)) {
        totals.total_sales += sale.collected();
        totals.remaining_customer_amount += sale.balance_amount;
    }
    for purchase in purchases
        .iter()
        .filter(|p| range.contains(p.purchase_date))
    {
        totals.total_purchases += purchase.paid_amount;
        totals.remaining_supplier_amount += purchase.outstanding();
    }
    for expenditure in expenditures.iter().filter(|e| range.contains(e.spent_on)) {
        totals.total_expenditures += expenditure.amount;
    }

    totals.profit = totals.total_sales - totals.total_expenditures - totals.total_purchases;
    totals
}
