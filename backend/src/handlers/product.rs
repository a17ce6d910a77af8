//! HTTP handlers for product management endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::{ApiResponse, AppResult};
use crate::services::product::{
    CreateProductInput, ListProductsFilter, Product, ProductService, UpdateProductInput,
};
use crate::AppState;

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let service = ProductService::new(state.db);
    let product = service.create_product(input).await?;
    Ok(ApiResponse::ok(product))
}

/// List products
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ListProductsFilter>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let service = ProductService::new(state.db);
    let products = service.list_products(filter).await?;
    Ok(ApiResponse::ok(products))
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let service = ProductService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(ApiResponse::ok(product))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let service = ProductService::new(state.db);
    let product = service.update_product(product_id, input).await?;
    Ok(ApiResponse::ok(product))
}

/// Delete a product (kept when it has purchase history)
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = ProductService::new(state.db);
    service.delete_product(product_id).await?;
    Ok(ApiResponse::ok(()))
}

/// Products at or below the configured low-stock threshold
pub async fn low_stock_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let threshold = state.config.shop.low_stock_threshold;
    let service = ProductService::new(state.db);
    let products = service.low_stock_products(threshold).await?;
    Ok(ApiResponse::ok(products))
}
