//! Product catalogue service for inventory management

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, AppResult};
use shared::validation::{validate_price, validate_product_name, validate_stock};

/// Product service for catalogue and stock lookups
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Product record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub purchase_price: Decimal,
    pub selling_price: Decimal,
    pub stock: i32,
    pub supplier_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub category: String,
    pub purchase_price: Decimal,
    pub selling_price: Decimal,
    pub stock: Option<i32>,
    pub supplier_name: Option<String>,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    pub supplier_name: Option<String>,
}

/// Filters for listing products
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        validate_product_name(&input.name).map_err(|msg| AppError::validation("name", msg))?;
        validate_price(input.purchase_price)
            .map_err(|msg| AppError::validation("purchase_price", msg))?;
        validate_price(input.selling_price)
            .map_err(|msg| AppError::validation("selling_price", msg))?;
        let stock = input.stock.unwrap_or(0);
        validate_stock(stock).map_err(|msg| AppError::validation("stock", msg))?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, category, purchase_price, selling_price, stock, supplier_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, category, purchase_price, selling_price, stock,
                      supplier_name, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.category)
        .bind(input.purchase_price)
        .bind(input.selling_price)
        .bind(stock)
        .bind(&input.supplier_name)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateEntry("product name".to_string())
            } else {
                AppError::DatabaseError(e)
            }
        })?;

        Ok(product)
    }

    /// List products, optionally narrowed by category or a name search
    pub async fn list_products(&self, filter: ListProductsFilter) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, purchase_price, selling_price, stock,
                   supplier_name, created_at, updated_at
            FROM products
            WHERE ($1::VARCHAR IS NULL OR category = $1)
              AND ($2::VARCHAR IS NULL OR name ILIKE '%' || $2 || '%')
            ORDER BY name ASC
            "#,
        )
        .bind(&filter.category)
        .bind(&filter.search)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Get a product by ID
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, purchase_price, selling_price, stock,
                   supplier_name, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product)
    }

    /// Update a product's catalogue fields
    ///
    /// Stock is not updated here; it only moves through purchases and sales.
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        if let Some(name) = &input.name {
            validate_product_name(name).map_err(|msg| AppError::validation("name", msg))?;
        }
        if let Some(price) = input.purchase_price {
            validate_price(price).map_err(|msg| AppError::validation("purchase_price", msg))?;
        }
        if let Some(price) = input.selling_price {
            validate_price(price).map_err(|msg| AppError::validation("selling_price", msg))?;
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                purchase_price = COALESCE($4, purchase_price),
                selling_price = COALESCE($5, selling_price),
                supplier_name = COALESCE($6, supplier_name),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, category, purchase_price, selling_price, stock,
                      supplier_name, created_at, updated_at
            "#,
        )
        .bind(product_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(&input.category)
        .bind(input.purchase_price)
        .bind(input.selling_price)
        .bind(&input.supplier_name)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateEntry("product name".to_string())
            } else {
                AppError::DatabaseError(e)
            }
        })?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product)
    }

    /// Delete a product
    ///
    /// A product referenced by any purchase is kept; deleting it would orphan
    /// the supplier ledger.
    pub async fn delete_product(&self, product_id: Uuid) -> AppResult<()> {
        let purchase_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM purchases WHERE product_id = $1")
                .bind(product_id)
                .fetch_one(&self.db)
                .await?;

        if purchase_count > 0 {
            return Err(AppError::Conflict {
                resource: "Product".to_string(),
                message: "Product has purchase history and cannot be deleted".to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    /// Products at or below the low-stock threshold
    pub async fn low_stock_products(&self, threshold: i32) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, purchase_price, selling_price, stock,
                   supplier_name, created_at, updated_at
            FROM products
            WHERE stock <= $1
            ORDER BY stock ASC, name ASC
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }
}
