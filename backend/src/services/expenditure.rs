//! Expenditure logging service

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::expenditure::denormalized_period;
use shared::validation::{validate_amount, validate_category, validate_month, validate_year};

/// Expenditure service for day-to-day shop costs
#[derive(Clone)]
pub struct ExpenditureService {
    db: PgPool,
}

/// Expenditure record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expenditure {
    pub id: Uuid,
    pub category: String,
    pub amount: Decimal,
    pub spent_on: NaiveDate,
    pub year: i32,
    pub month: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an expenditure
#[derive(Debug, Deserialize)]
pub struct AddExpenditureInput {
    pub category: String,
    pub amount: Decimal,
    pub spent_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Filters for listing expenditures
#[derive(Debug, Default, Deserialize)]
pub struct ListExpendituresFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub category: Option<String>,
}

impl ExpenditureService {
    /// Create a new ExpenditureService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an expenditure
    ///
    /// Year and month are denormalized from the date at write time so list
    /// and report queries can filter on plain integer columns.
    pub async fn add_expenditure(&self, input: AddExpenditureInput) -> AppResult<Expenditure> {
        validate_category(&input.category).map_err(|msg| AppError::validation("category", msg))?;
        validate_amount(input.amount).map_err(|msg| AppError::validation("amount", msg))?;

        let spent_on = input.spent_on.unwrap_or_else(|| Utc::now().date_naive());
        let (year, month) = denormalized_period(spent_on);

        let expenditure = sqlx::query_as::<_, Expenditure>(
            r#"
            INSERT INTO expenditures (category, amount, spent_on, year, month, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, category, amount, spent_on, year, month, notes, created_at
            "#,
        )
        .bind(input.category.trim())
        .bind(input.amount)
        .bind(spent_on)
        .bind(year)
        .bind(month as i32)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(expenditure)
    }

    /// List expenditures, newest first
    pub async fn list_expenditures(
        &self,
        filter: ListExpendituresFilter,
    ) -> AppResult<Vec<Expenditure>> {
        if let Some(year) = filter.year {
            validate_year(year).map_err(|msg| AppError::validation("year", msg))?;
        }
        if let Some(month) = filter.month {
            validate_month(month).map_err(|msg| AppError::validation("month", msg))?;
        }

        let expenditures = sqlx::query_as::<_, Expenditure>(
            r#"
            SELECT id, category, amount, spent_on, year, month, notes, created_at
            FROM expenditures
            WHERE ($1::INTEGER IS NULL OR year = $1)
              AND ($2::INTEGER IS NULL OR month = $2)
              AND ($3::VARCHAR IS NULL OR category = $3)
            ORDER BY spent_on DESC, created_at DESC
            "#,
        )
        .bind(filter.year)
        .bind(filter.month.map(|m| m as i32))
        .bind(&filter.category)
        .fetch_all(&self.db)
        .await?;

        Ok(expenditures)
    }

    /// Delete an expenditure
    pub async fn delete_expenditure(&self, expenditure_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM expenditures WHERE id = $1")
            .bind(expenditure_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Expenditure".to_string()));
        }

        Ok(())
    }
}
