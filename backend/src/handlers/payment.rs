//! HTTP handlers for supplier payment endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{ApiResponse, AppResult};
use crate::services::payment::{AddSupplierPaymentInput, PaymentService, SupplierPayment};
use crate::AppState;

/// Record a payment against a purchase
pub async fn add_supplier_payment(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
    Json(input): Json<AddSupplierPaymentInput>,
) -> AppResult<Json<ApiResponse<SupplierPayment>>> {
    let service = PaymentService::new(state.db);
    let payment = service.add_payment(purchase_id, input).await?;
    Ok(ApiResponse::ok(payment))
}

/// List payments recorded against a purchase
pub async fn list_supplier_payments(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<SupplierPayment>>>> {
    let service = PaymentService::new(state.db);
    let payments = service.list_payments(purchase_id).await?;
    Ok(ApiResponse::ok(payments))
}

/// Delete a payment and back it out of its purchase
pub async fn delete_supplier_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = PaymentService::new(state.db);
    service.delete_payment(payment_id).await?;
    Ok(ApiResponse::ok(()))
}
