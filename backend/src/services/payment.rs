//! Supplier payment service for settling purchase bills in installments

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::purchase::{
    apply_supplier_payment, remove_supplier_payment, PurchaseStatus,
};
use shared::types::PaymentMethod;
use shared::validation::validate_amount;

/// Payment service for the supplier side of the ledger
#[derive(Clone)]
pub struct PaymentService {
    db: PgPool,
}

/// One payment made to a supplier against a purchase
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupplierPayment {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub product_id: Uuid,
    pub amount: Decimal,
    pub method: String,
    pub payment_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a supplier payment
#[derive(Debug, Deserialize)]
pub struct AddSupplierPaymentInput {
    pub amount: Decimal,
    pub method: Option<PaymentMethod>,
    pub payment_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Purchase columns the bookkeeping needs
#[derive(Debug, FromRow)]
struct PurchaseBalanceRow {
    id: Uuid,
    product_id: Uuid,
    total_amount: Decimal,
    paid_amount: Decimal,
    status: String,
}

impl PaymentService {
    /// Create a new PaymentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a payment against a purchase
    ///
    /// The purchase's paid amount and status are updated in the same
    /// transaction as the payment row.
    pub async fn add_payment(
        &self,
        purchase_id: Uuid,
        input: AddSupplierPaymentInput,
    ) -> AppResult<SupplierPayment> {
        validate_amount(input.amount).map_err(|msg| AppError::validation("amount", msg))?;

        let mut tx = self.db.begin().await?;

        let purchase = sqlx::query_as::<_, PurchaseBalanceRow>(
            "SELECT id, product_id, total_amount, paid_amount, status FROM purchases WHERE id = $1",
        )
        .bind(purchase_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let status = PurchaseStatus::from_str(&purchase.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown purchase status: {}", purchase.status)))?;

        let (new_paid, new_status) = apply_supplier_payment(
            purchase.total_amount,
            purchase.paid_amount,
            status,
            input.amount,
        )?;

        sqlx::query(
            "UPDATE purchases SET paid_amount = $2, status = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(purchase.id)
        .bind(new_paid)
        .bind(new_status.as_str())
        .execute(&mut *tx)
        .await?;

        let method = input.method.unwrap_or_default();
        let payment_date = input
            .payment_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let payment = sqlx::query_as::<_, SupplierPayment>(
            r#"
            INSERT INTO supplier_payments (purchase_id, product_id, amount, method, payment_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, purchase_id, product_id, amount, method, payment_date, notes, created_at
            "#,
        )
        .bind(purchase.id)
        .bind(purchase.product_id)
        .bind(input.amount)
        .bind(method.as_str())
        .bind(payment_date)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(payment)
    }

    /// List all payments recorded against a purchase
    pub async fn list_payments(&self, purchase_id: Uuid) -> AppResult<Vec<SupplierPayment>> {
        let purchase_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM purchases WHERE id = $1)")
                .bind(purchase_id)
                .fetch_one(&self.db)
                .await?;

        if !purchase_exists {
            return Err(AppError::NotFound("Purchase".to_string()));
        }

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

        Ok(payments)
    }

    /// Delete a payment and back it out of the purchase's paid amount
    ///
    /// The paid amount never goes negative; the purchase reverts paid ->
    /// pending only when it was paid and the remaining amount falls short of
    /// the total.
    pub async fn delete_payment(&self, payment_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let payment = sqlx::query_as::<_, (Uuid, Uuid, Decimal)>(
            "SELECT id, purchase_id, amount FROM supplier_payments WHERE id = $1",
        )
        .bind(payment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment".to_string()))?;

        let purchase = sqlx::query_as::<_, PurchaseBalanceRow>(
            "SELECT id, product_id, total_amount, paid_amount, status FROM purchases WHERE id = $1",
        )
        .bind(payment.1)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let status = PurchaseStatus::from_str(&purchase.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown purchase status: {}", purchase.status)))?;

        let (new_paid, new_status) = remove_supplier_payment(
            purchase.total_amount,
            purchase.paid_amount,
            status,
            payment.2,
        );

        sqlx::query(
            "UPDATE purchases SET paid_amount = $2, status = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(purchase.id)
        .bind(new_paid)
        .bind(new_status.as_str())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM supplier_payments WHERE id = $1")
            .bind(payment.0)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
