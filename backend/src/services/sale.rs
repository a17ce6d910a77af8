//! Customer sale service: point-of-sale billing with installment payments

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::product::issue_stock;
use shared::models::sale::{
    apply_installment, initial_sale_state, sale_total, SaleLine, SaleStatus,
};
use shared::models::BillingError;
use shared::types::PaymentMethod;
use shared::validation::{
    customer_or_walk_in, validate_amount, validate_initial_payment, validate_price,
    validate_quantity,
};

/// Sale service for the customer side of the shop
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
}

/// Sale record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Sale {
    pub id: Uuid,
    pub customer_name: String,
    pub payment_type: String,
    pub status: String,
    pub total_amount: Decimal,
    /// Paid to date, grown by every installment
    pub initial_payment: Decimal,
    pub balance_amount: Decimal,
    pub sale_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line item of a sale, with a product snapshot
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One customer installment against a sale
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SalePayment {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub amount: Decimal,
    pub method: String,
    pub payment_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Sale with its items and payment history
#[derive(Debug, Serialize)]
pub struct SaleWithDetails {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
    pub payment_history: Vec<SalePayment>,
}

/// Input for one sale line
#[derive(Debug, Deserialize)]
pub struct SaleItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
    /// Optional override; defaults to the product's selling price
    pub unit_price: Option<Decimal>,
}

/// Input for creating a sale
#[derive(Debug, Deserialize)]
pub struct CreateSaleInput {
    pub customer_name: Option<String>,
    pub payment_type: Option<PaymentMethod>,
    pub initial_payment: Option<Decimal>,
    pub sale_date: Option<NaiveDate>,
    pub items: Vec<SaleItemInput>,
}

/// Input for an installment payment
#[derive(Debug, Deserialize)]
pub struct AddInstallmentInput {
    pub amount: Decimal,
    pub method: Option<PaymentMethod>,
    pub payment_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Filters for listing sales
#[derive(Debug, Default, Deserialize)]
pub struct ListSalesFilter {
    pub status: Option<String>,
    pub sale_date: Option<NaiveDate>,
    pub customer: Option<String>,
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a sale, decrementing stock per line item
    ///
    /// Runs in one transaction: a failed stock check aborts the whole sale
    /// and no stock is touched.
    pub async fn create_sale(&self, input: CreateSaleInput) -> AppResult<SaleWithDetails> {
        if input.items.is_empty() {
            return Err(BillingError::EmptySale.into());
        }
        let initial_payment = input.initial_payment.unwrap_or(Decimal::ZERO);
        validate_initial_payment(initial_payment)
            .map_err(|msg| AppError::validation("initial_payment", msg))?;

        let mut tx = self.db.begin().await?;

        // Price and stock-check every line before any write
        let mut priced_lines = Vec::with_capacity(input.items.len());
        for item in &input.items {
            validate_quantity(item.quantity)
                .map_err(|msg| AppError::validation("quantity", msg))?;

            let product = sqlx::query_as::<_, (String, Decimal, i32)>(
                "SELECT name, selling_price, stock FROM products WHERE id = $1",
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {}", item.product_id)))?;

            let (product_name, selling_price, stock) = product;
            let new_stock = issue_stock(stock, item.quantity).map_err(|_| {
                AppError::InsufficientStock(format!(
                    "Insufficient stock for '{}': requested {}, available {}",
                    product_name, item.quantity, stock
                ))
            })?;

            let unit_price = item.unit_price.unwrap_or(selling_price);
            validate_price(unit_price).map_err(|msg| AppError::validation("unit_price", msg))?;

            priced_lines.push((
                item.product_id,
                product_name,
                item.quantity,
                unit_price,
                new_stock,
            ));
        }

        let lines: Vec<SaleLine> = priced_lines
            .iter()
            .map(|(_, _, quantity, unit_price, _)| SaleLine {
                quantity: *quantity,
                unit_price: *unit_price,
            })
            .collect();
        let total = sale_total(&lines);
        let (balance, status) = initial_sale_state(total, initial_payment);

        let customer_name = customer_or_walk_in(input.customer_name.as_deref());
        let payment_type = input.payment_type.unwrap_or_default();
        let sale_date = input.sale_date.unwrap_or_else(|| Utc::now().date_naive());

        let (sale_id, created_at, updated_at) =
            sqlx::query_as::<_, (Uuid, DateTime<Utc>, DateTime<Utc>)>(
                r#"
                INSERT INTO sales (
                    customer_name, payment_type, status, total_amount,
                    initial_payment, balance_amount, sale_date
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, created_at, updated_at
                "#,
            )
            .bind(&customer_name)
            .bind(payment_type.as_str())
            .bind(status.as_str())
            .bind(total)
            .bind(initial_payment)
            .bind(balance)
            .bind(sale_date)
            .fetch_one(&mut *tx)
            .await?;

        let mut items = Vec::with_capacity(priced_lines.len());
        for (product_id, product_name, quantity, unit_price, new_stock) in priced_lines {
            let line_total = Decimal::from(quantity) * unit_price;

            let (item_id, item_created_at) = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
                r#"
                INSERT INTO sale_items (sale_id, product_id, product_name, quantity, unit_price, line_total)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, created_at
                "#,
            )
            .bind(sale_id)
            .bind(product_id)
            .bind(&product_name)
            .bind(quantity)
            .bind(unit_price)
            .bind(line_total)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("UPDATE products SET stock = $2, updated_at = NOW() WHERE id = $1")
                .bind(product_id)
                .bind(new_stock)
                .execute(&mut *tx)
                .await?;

            items.push(SaleItem {
                id: item_id,
                sale_id,
                product_id,
                product_name,
                quantity,
                unit_price,
                line_total,
                created_at: item_created_at,
            });
        }

        let mut payment_history = Vec::new();
        if initial_payment > Decimal::ZERO {
            let payment = sqlx::query_as::<_, SalePayment>(
                r#"
                INSERT INTO sale_payments (sale_id, amount, method, payment_date)
                VALUES ($1, $2, $3, $4)
                RETURNING id, sale_id, amount, method, payment_date, notes, created_at
                "#,
            )
            .bind(sale_id)
            .bind(initial_payment)
            .bind(payment_type.as_str())
            .bind(sale_date)
            .fetch_one(&mut *tx)
            .await?;
            payment_history.push(payment);
        }

        tx.commit().await?;

        Ok(SaleWithDetails {
            sale: Sale {
                id: sale_id,
                customer_name,
                payment_type: payment_type.as_str().to_string(),
                status: status.as_str().to_string(),
                total_amount: total,
                initial_payment,
                balance_amount: balance,
                sale_date,
                created_at,
                updated_at,
            },
            items,
            payment_history,
        })
    }

    /// Get a sale with its items and payment history
    pub async fn get_sale(&self, sale_id: Uuid) -> AppResult<SaleWithDetails> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_name, payment_type, status, total_amount,
                   initial_payment, balance_amount, sale_date, created_at, updated_at
            FROM sales
            WHERE id = $1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, product_name, quantity, unit_price, line_total, created_at
            FROM sale_items
            WHERE sale_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.db)
        .await?;

        let payment_history = sqlx::query_as::<_, SalePayment>(
            r#"
            SELECT id, sale_id, amount, method, payment_date, notes, created_at
            FROM sale_payments
            WHERE sale_id = $1
            ORDER BY payment_date ASC, created_at ASC
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.db)
        .await?;

        Ok(SaleWithDetails {
            sale,
            items,
            payment_history,
        })
    }

    /// List sales, newest first
    pub async fn list_sales(&self, filter: ListSalesFilter) -> AppResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_name, payment_type, status, total_amount,
                   initial_payment, balance_amount, sale_date, created_at, updated_at
            FROM sales
            WHERE ($1::VARCHAR IS NULL OR status = $1)
              AND ($2::DATE IS NULL OR sale_date = $2)
              AND ($3::VARCHAR IS NULL OR customer_name ILIKE '%' || $3 || '%')
            ORDER BY sale_date DESC, created_at DESC
            "#,
        )
        .bind(&filter.status)
        .bind(filter.sale_date)
        .bind(&filter.customer)
        .fetch_all(&self.db)
        .await?;

        Ok(sales)
    }

    /// Sales with an outstanding balance
    pub async fn pending_sales(&self) -> AppResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_name, payment_type, status, total_amount,
                   initial_payment, balance_amount, sale_date, created_at, updated_at
            FROM sales
            WHERE balance_amount > 0
            ORDER BY sale_date ASC, created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(sales)
    }

    /// Record an installment against a pending sale
    pub async fn make_additional_payment(
        &self,
        sale_id: Uuid,
        input: AddInstallmentInput,
    ) -> AppResult<SaleWithDetails> {
        validate_amount(input.amount).map_err(|msg| AppError::validation("amount", msg))?;

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, (Decimal, Decimal)>(
            "SELECT initial_payment, balance_amount FROM sales WHERE id = $1",
        )
        .bind(sale_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let outcome = apply_installment(row.0, row.1, input.amount)?;

        sqlx::query(
            r#"
            UPDATE sales SET
                initial_payment = $2,
                balance_amount = $3,
                status = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(sale_id)
        .bind(outcome.paid_to_date)
        .bind(outcome.balance_amount)
        .bind(outcome.status.as_str())
        .execute(&mut *tx)
        .await?;

        let method = input.method.unwrap_or_default();
        let payment_date = input
            .payment_date
            .unwrap_or_else(|| Utc::now().date_naive());

        sqlx::query(
            r#"
            INSERT INTO sale_payments (sale_id, amount, method, payment_date, notes)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(sale_id)
        .bind(input.amount)
        .bind(method.as_str())
        .bind(payment_date)
        .bind(&input.notes)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_sale(sale_id).await
    }

    /// Force the status to paid without touching the amounts
    ///
    /// The balance and payment history are left as they are, so both can
    /// disagree with the status after this call.
    pub async fn mark_sale_paid(&self, sale_id: Uuid) -> AppResult<Sale> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, customer_name, payment_type, status, total_amount,
                      initial_payment, balance_amount, sale_date, created_at, updated_at
            "#,
        )
        .bind(sale_id)
        .bind(SaleStatus::Paid.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        Ok(sale)
    }

    /// Delete a sale with its items and payment history
    ///
    /// Stock issued by the sale is not restored.
    pub async fn delete_sale(&self, sale_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(sale_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Sale".to_string()));
        }

        Ok(())
    }
}
