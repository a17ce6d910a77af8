//! HTTP handler for the dashboard endpoint

use axum::{extract::State, Json};

use crate::error::{ApiResponse, AppResult};
use crate::services::dashboard::{DashboardMetrics, DashboardService};
use crate::AppState;

/// Aggregate metrics for the back-office landing page
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DashboardMetrics>>> {
    let threshold = state.config.shop.low_stock_threshold;
    let service = DashboardService::new(state.db);
    let metrics = service.get_metrics(threshold).await?;
    Ok(ApiResponse::ok(metrics))
}
