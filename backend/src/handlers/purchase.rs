//! HTTP handlers for supplier purchase endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::{ApiResponse, AppResult};
use crate::services::purchase::{
    CreatePurchaseInput, ListPurchasesFilter, PendingPurchasesReport, PendingScope, Purchase,
    PurchaseService, PurchaseWithPayments,
};
use crate::AppState;

/// Record a purchase and stock the product in
pub async fn add_purchase(
    State(state): State<AppState>,
    Json(input): Json<CreatePurchaseInput>,
) -> AppResult<Json<ApiResponse<Purchase>>> {
    let service = PurchaseService::new(state.db);
    let purchase = service.add_purchase(input).await?;
    Ok(ApiResponse::ok(purchase))
}

/// List purchases
pub async fn list_purchases(
    State(state): State<AppState>,
    Query(filter): Query<ListPurchasesFilter>,
) -> AppResult<Json<ApiResponse<Vec<Purchase>>>> {
    let service = PurchaseService::new(state.db);
    let purchases = service.list_purchases(filter).await?;
    Ok(ApiResponse::ok(purchases))
}

/// Get a purchase with its payment history
pub async fn get_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PurchaseWithPayments>>> {
    let service = PurchaseService::new(state.db);
    let purchase = service.get_purchase_with_payments(purchase_id).await?;
    Ok(ApiResponse::ok(purchase))
}

/// Force-settle a purchase
pub async fn mark_purchase_paid(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Purchase>>> {
    let service = PurchaseService::new(state.db);
    let purchase = service.mark_purchase_paid(purchase_id).await?;
    Ok(ApiResponse::ok(purchase))
}

/// Delete a purchase and its supplier payments
pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = PurchaseService::new(state.db);
    service.delete_purchase(purchase_id).await?;
    Ok(ApiResponse::ok(()))
}

/// Pending purchase bills with aggregate stats, optionally scoped to a
/// calendar month or a financial year
pub async fn pending_purchases(
    State(state): State<AppState>,
    Query(scope): Query<PendingScope>,
) -> AppResult<Json<ApiResponse<PendingPurchasesReport>>> {
    let service = PurchaseService::new(state.db);
    let report = service.pending_purchases(scope).await?;
    Ok(ApiResponse::ok(report))
}
