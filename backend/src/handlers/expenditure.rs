//! HTTP handlers for expenditure endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::{ApiResponse, AppResult};
use crate::services::expenditure::{
    AddExpenditureInput, Expenditure, ExpenditureService, ListExpendituresFilter,
};
use crate::AppState;

/// Record an expenditure
pub async fn add_expenditure(
    State(state): State<AppState>,
    Json(input): Json<AddExpenditureInput>,
) -> AppResult<Json<ApiResponse<Expenditure>>> {
    let service = ExpenditureService::new(state.db);
    let expenditure = service.add_expenditure(input).await?;
    Ok(ApiResponse::ok(expenditure))
}

/// List expenditures
pub async fn list_expenditures(
    State(state): State<AppState>,
    Query(filter): Query<ListExpendituresFilter>,
) -> AppResult<Json<ApiResponse<Vec<Expenditure>>>> {
    let service = ExpenditureService::new(state.db);
    let expenditures = service.list_expenditures(filter).await?;
    Ok(ApiResponse::ok(expenditures))
}

/// Delete an expenditure
pub async fn delete_expenditure(
    State(state): State<AppState>,
    Path(expenditure_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = ExpenditureService::new(state.db);
    service.delete_expenditure(expenditure_id).await?;
    Ok(ApiResponse::ok(()))
}
