//! Dashboard metrics service

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;

/// Dashboard service for the back-office landing page
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

/// Aggregate metrics shown on the dashboard
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_products: i64,
    pub units_in_stock: i64,
    pub low_stock_products: i64,
    pub todays_sales: i64,
    pub todays_collections: Decimal,
    pub month_to_date_collections: Decimal,
    pub month_to_date_expenditures: Decimal,
    pub pending_purchase_bills: i64,
    pub pending_sale_bills: i64,
    pub outstanding_supplier_amount: Decimal,
    pub outstanding_customer_amount: Decimal,
}

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Gather the dashboard metrics
    pub async fn get_metrics(&self, low_stock_threshold: i32) -> AppResult<DashboardMetrics> {
        // Catalogue size and units on the floor
        let product_counts: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(stock), 0)::BIGINT FROM products",
        )
        .fetch_one(&self.db)
        .await?;

        let low_stock_products: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE stock <= $1")
                .bind(low_stock_threshold)
                .fetch_one(&self.db)
                .await?;

        // Today's counter activity; collections are total minus balance
        let todays: (i64, Decimal) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_amount - balance_amount), 0)
            FROM sales
            WHERE sale_date = CURRENT_DATE
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let month_to_date_collections: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_amount - balance_amount), 0)
            FROM sales
            WHERE sale_date >= DATE_TRUNC('month', CURRENT_DATE)::DATE
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let month_to_date_expenditures: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM expenditures
            WHERE spent_on >= DATE_TRUNC('month', CURRENT_DATE)::DATE
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        // Open bills on both sides of the ledger
        let pending_purchases: (i64, Decimal) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_amount - paid_amount), 0)
            FROM purchases
            WHERE total_amount - paid_amount > 0
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let pending_sales: (i64, Decimal) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(balance_amount), 0)
            FROM sales
            WHERE balance_amount > 0
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            total_products: product_counts.0,
            units_in_stock: product_counts.1,
            low_stock_products,
            todays_sales: todays.0,
            todays_collections: todays.1,
            month_to_date_collections,
            month_to_date_expenditures,
            pending_purchase_bills: pending_purchases.0,
            pending_sale_bills: pending_sales.0,
            outstanding_supplier_amount: pending_purchases.1,
            outstanding_customer_amount: pending_sales.1,
        })
    }
}
