//! Expenditure helpers
//!
//! Expenditure rows carry denormalized year and month columns so the report
//! and list queries can filter without date arithmetic.

use chrono::{Datelike, NaiveDate};

/// Year and month to denormalize onto an expenditure row
pub fn denormalized_period(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
