//! Supplier purchase service: stock-in with partial-payment tracking

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::payment::SupplierPayment;
use shared::models::product::receive_stock;
use shared::models::purchase::{
    initial_purchase_state, pending_bill_stats, purchase_total, settle_purchase,
    PendingBillFigure, PendingBillStats, PurchaseStatus,
};
use shared::models::report::ReportRange;
use shared::validation::{
    validate_initial_payment, validate_month, validate_price, validate_quantity, validate_year,
};

/// Purchase service for the supplier side of the shop
#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
}

/// Purchase record joined with its product name
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Purchase {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub total_amount: Decimal,
    pub status: String,
    pub initial_payment: Decimal,
    pub paid_amount: Decimal,
    pub purchase_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Purchase with its supplier payment history
#[derive(Debug, Serialize)]
pub struct PurchaseWithPayments {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub payments: Vec<SupplierPayment>,
}

/// Input for recording a purchase
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseInput {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub status: PurchaseStatus,
    pub initial_payment: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
}

/// Filters for listing purchases
#[derive(Debug, Default, Deserialize)]
pub struct ListPurchasesFilter {
    pub status: Option<String>,
    pub product_id: Option<Uuid>,
}

/// Scope query for pending purchase bills
#[derive(Debug, Default, Deserialize)]
pub struct PendingScope {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub financial_year: Option<i32>,
}

/// One pending purchase bill
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PendingPurchaseBill {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub supplier_name: Option<String>,
    pub quantity: i32,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub status: String,
    pub purchase_date: NaiveDate,
}

/// Pending bills plus their aggregate stats
#[derive(Debug, Serialize)]
pub struct PendingPurchasesReport {
    pub bills: Vec<PendingPurchaseBill>,
    pub stats: PendingBillStats,
}

impl PurchaseService {
    /// Create a new PurchaseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a purchase and stock the product in
    ///
    /// Stock is incremented by the purchased quantity regardless of payment
    /// status; a pending purchase still puts the goods on the floor.
    pub async fn add_purchase(&self, input: CreatePurchaseInput) -> AppResult<Purchase> {
        validate_quantity(input.quantity).map_err(|msg| AppError::validation("quantity", msg))?;
        validate_price(input.price_per_unit)
            .map_err(|msg| AppError::validation("price_per_unit", msg))?;
        let initial_payment = input.initial_payment.unwrap_or(Decimal::ZERO);
        validate_initial_payment(initial_payment)
            .map_err(|msg| AppError::validation("initial_payment", msg))?;

        let mut tx = self.db.begin().await?;

        let product = sqlx::query_as::<_, (String, i32)>(
            "SELECT name, stock FROM products WHERE id = $1",
        )
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let total = purchase_total(input.quantity, input.price_per_unit);
        let (paid_amount, status) = initial_purchase_state(total, input.status, initial_payment);
        let purchase_date = input
            .purchase_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let (id, created_at, updated_at) =
            sqlx::query_as::<_, (Uuid, DateTime<Utc>, DateTime<Utc>)>(
                r#"
                INSERT INTO purchases (
                    product_id, quantity, price_per_unit, total_amount,
                    status, initial_payment, paid_amount, purchase_date
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, created_at, updated_at
                "#,
            )
            .bind(input.product_id)
            .bind(input.quantity)
            .bind(input.price_per_unit)
            .bind(total)
            .bind(status.as_str())
            .bind(paid_amount)
            .bind(paid_amount)
            .bind(purchase_date)
            .fetch_one(&mut *tx)
            .await?;

        let new_stock = receive_stock(product.1, input.quantity);
        sqlx::query("UPDATE products SET stock = $2, updated_at = NOW() WHERE id = $1")
            .bind(input.product_id)
            .bind(new_stock)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Purchase {
            id,
            product_id: input.product_id,
            product_name: product.0,
            quantity: input.quantity,
            price_per_unit: input.price_per_unit,
            total_amount: total,
            status: status.as_str().to_string(),
            initial_payment: paid_amount,
            paid_amount,
            purchase_date,
            created_at,
            updated_at,
        })
    }

    /// List purchases, newest first
    pub async fn list_purchases(&self, filter: ListPurchasesFilter) -> AppResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT p.id, p.product_id, pr.name AS product_name, p.quantity, p.price_per_unit,
                   p.total_amount, p.status, p.initial_payment, p.paid_amount, p.purchase_date,
                   p.created_at, p.updated_at
            FROM purchases p
            JOIN products pr ON pr.id = p.product_id
            WHERE ($1::VARCHAR IS NULL OR p.status = $1)
              AND ($2::UUID IS NULL OR p.product_id = $2)
            ORDER BY p.purchase_date DESC, p.created_at DESC
            "#,
        )
        .bind(&filter.status)
        .bind(filter.product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(purchases)
    }

    /// Get a purchase with its payment history
    pub async fn get_purchase_with_payments(
        &self,
        purchase_id: Uuid,
    ) -> AppResult<PurchaseWithPayments> {
        let purchase = self.get_purchase(purchase_id).await?;

        let payments = sqlx::query_as::<_, SupplierPayment>(
            r#"
            SELECT id, purchase_id, product_id, amount, method, payment_date, notes, created_at
            FROM supplier_payments
            WHERE purchase_id = $1
            ORDER BY payment_date ASC, created_at ASC
            "#,
        )
        .bind(purchase_id)
        .fetch_all(&self.db)
        .await?;

        Ok(PurchaseWithPayments { purchase, payments })
    }

    /// Get a purchase by ID
    pub async fn get_purchase(&self, purchase_id: Uuid) -> AppResult<Purchase> {
        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT p.id, p.product_id, pr.name AS product_name, p.quantity, p.price_per_unit,
                   p.total_amount, p.status, p.initial_payment, p.paid_amount, p.purchase_date,
                   p.created_at, p.updated_at
            FROM purchases p
            JOIN products pr ON pr.id = p.product_id
            WHERE p.id = $1
            "#,
        )
        .bind(purchase_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        Ok(purchase)
    }

    /// Force-settle a purchase
    ///
    /// Jumps the paid amount to the total without writing a payment row, so
    /// the payment history stays short of the paid amount afterwards. Fails
    /// when the purchase is already paid.
    pub async fn mark_purchase_paid(&self, purchase_id: Uuid) -> AppResult<Purchase> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, (Decimal, String)>(
            "SELECT total_amount, status FROM purchases WHERE id = $1",
        )
        .bind(purchase_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let status = PurchaseStatus::from_str(&row.1)
            .ok_or_else(|| AppError::Internal(format!("Unknown purchase status: {}", row.1)))?;

        let (paid_amount, new_status) = settle_purchase(row.0, status)?;

        sqlx::query(
            "UPDATE purchases SET paid_amount = $2, status = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(purchase_id)
        .bind(paid_amount)
        .bind(new_status.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_purchase(purchase_id).await
    }

    /// Delete a purchase and its supplier payments
    ///
    /// Stock received from the purchase is not backed out.
    pub async fn delete_purchase(&self, purchase_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(purchase_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Purchase".to_string()));
        }

        Ok(())
    }

    /// Pending purchase bills with aggregate stats
    ///
    /// Optionally scoped to one calendar month or one April-March financial
    /// year of purchase dates.
    pub async fn pending_purchases(&self, scope: PendingScope) -> AppResult<PendingPurchasesReport> {
        let range = Self::resolve_scope(&scope)?;
        let (start, end) = match range {
            Some(r) => (Some(r.start), Some(r.end)),
            None => (None, None),
        };

        let bills = sqlx::query_as::<_, PendingPurchaseBill>(
            r#"
            SELECT p.id, p.product_id, pr.name AS product_name, pr.supplier_name,
                   p.quantity, p.total_amount, p.paid_amount,
                   p.total_amount - p.paid_amount AS pending_amount,
                   p.status, p.purchase_date
            FROM purchases p
            JOIN products pr ON pr.id = p.product_id
            WHERE p.total_amount - p.paid_amount > 0
              AND ($1::DATE IS NULL OR p.purchase_date BETWEEN $1 AND $2)
            ORDER BY p.purchase_date ASC, p.created_at ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        let figures: Vec<PendingBillFigure> = bills
            .iter()
            .map(|b| PendingBillFigure {
                supplier_name: b
                    .supplier_name
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                outstanding: b.pending_amount,
            })
            .collect();

        Ok(PendingPurchasesReport {
            stats: pending_bill_stats(&figures),
            bills,
        })
    }

    /// Turn the scope query into a date range, if any
    fn resolve_scope(scope: &PendingScope) -> AppResult<Option<ReportRange>> {
        if let Some(start_year) = scope.financial_year {
            validate_year(start_year).map_err(|msg| AppError::validation("financial_year", msg))?;
            return Ok(Some(ReportRange::financial_year(start_year)));
        }
        match (scope.year, scope.month) {
            (Some(year), Some(month)) => {
                validate_year(year).map_err(|msg| AppError::validation("year", msg))?;
                validate_month(month).map_err(|msg| AppError::validation("month", msg))?;
                let range = ReportRange::calendar_month(year, month).ok_or_else(|| {
                    AppError::validation("month", "Month must be between 1 and 12")
                })?;
                Ok(Some(range))
            }
            (None, None) => Ok(None),
            _ => Err(AppError::ValidationError(
                "Both year and month are required for a monthly scope".to_string(),
            )),
        }
    }
}
