//! HTTP handlers for point-of-sale endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::{ApiResponse, AppResult};
use crate::services::sale::{
    AddInstallmentInput, CreateSaleInput, ListSalesFilter, Sale, SaleService, SaleWithDetails,
};
use crate::AppState;

/// Create a sale, decrementing stock per line item
pub async fn create_sale(
    State(state): State<AppState>,
    Json(input): Json<CreateSaleInput>,
) -> AppResult<Json<ApiResponse<SaleWithDetails>>> {
    let service = SaleService::new(state.db);
    let sale = service.create_sale(input).await?;
    Ok(ApiResponse::ok(sale))
}

/// List sales
pub async fn list_sales(
    State(state): State<AppState>,
    Query(filter): Query<ListSalesFilter>,
) -> AppResult<Json<ApiResponse<Vec<Sale>>>> {
    let service = SaleService::new(state.db);
    let sales = service.list_sales(filter).await?;
    Ok(ApiResponse::ok(sales))
}

/// Get a sale with its items and payment history
pub async fn get_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SaleWithDetails>>> {
    let service = SaleService::new(state.db);
    let sale = service.get_sale(sale_id).await?;
    Ok(ApiResponse::ok(sale))
}

/// Sales with an outstanding balance
pub async fn pending_sales(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Sale>>>> {
    let service = SaleService::new(state.db);
    let sales = service.pending_sales().await?;
    Ok(ApiResponse::ok(sales))
}

/// Record an installment against a pending sale
pub async fn make_additional_payment(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
    Json(input): Json<AddInstallmentInput>,
) -> AppResult<Json<ApiResponse<SaleWithDetails>>> {
    let service = SaleService::new(state.db);
    let sale = service.make_additional_payment(sale_id, input).await?;
    Ok(ApiResponse::ok(sale))
}

/// Force a sale's status to paid without touching the amounts
pub async fn mark_sale_paid(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    let service = SaleService::new(state.db);
    let sale = service.mark_sale_paid(sale_id).await?;
    Ok(ApiResponse::ok(sale))
}

/// Delete a sale with its items and payment history
pub async fn delete_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = SaleService::new(state.db);
    service.delete_sale(sale_id).await?;
    Ok(ApiResponse::ok(()))
}
