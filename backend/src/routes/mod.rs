//! Route definitions for the Furniture Shop Management Platform

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Product management
        .nest("/products", product_routes())
        // Supplier purchases
        .nest("/purchases", purchase_routes())
        // Supplier payments
        .nest("/payments", payment_routes())
        // Point-of-sale billing
        .nest("/sales", sale_routes())
        // Expenditure log
        .nest("/expenditures", expenditure_routes())
        // Financial reports
        .nest("/reports", report_routes())
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
}

/// Product management routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/low-stock", get(handlers::low_stock_products))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
}

/// Supplier purchase routes
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchases).post(handlers::add_purchase),
        )
        .route("/pending", get(handlers::pending_purchases))
        .route(
            "/:purchase_id",
            get(handlers::get_purchase).delete(handlers::delete_purchase),
        )
        .route("/:purchase_id/mark-paid", post(handlers::mark_purchase_paid))
        .route(
            "/:purchase_id/payments",
            get(handlers::list_supplier_payments).post(handlers::add_supplier_payment),
        )
}

/// Supplier payment routes
fn payment_routes() -> Router<AppState> {
    Router::new().route("/:payment_id", delete(handlers::delete_supplier_payment))
}

/// Point-of-sale routes
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route("/pending", get(handlers::pending_sales))
        .route(
            "/:sale_id",
            get(handlers::get_sale).delete(handlers::delete_sale),
        )
        .route("/:sale_id/payments", post(handlers::make_additional_payment))
        .route("/:sale_id/mark-paid", post(handlers::mark_sale_paid))
}

/// Expenditure routes
fn expenditure_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_expenditures).post(handlers::add_expenditure),
        )
        .route("/:expenditure_id", delete(handlers::delete_expenditure))
}

/// Financial report routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/daily", get(handlers::daily_report))
        .route("/monthly", get(handlers::monthly_report))
        .route("/yearly", get(handlers::yearly_report))
        .route("/financial-year", get(handlers::financial_year_report))
}
