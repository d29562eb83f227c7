//! Admin API Handlers
//!
//! Catalog management goes through the ownership guard (creators manage
//! their own products, admins manage everything); order management,
//! customers and the dashboard are admin-only.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use shared::models::{Category, CategoryCreate, Order, Product, ProductCreate, ProductUpdate};
use shared::{ApiResponse, AppResult};

use crate::admin::{
    AdminAccessLayer, CustomerSummary, DashboardStats, OrderListQuery, OrderPage, StatsPeriod,
    TopProduct,
};
use crate::auth::{OwnershipContext, OwnershipGuard};
use crate::core::ServerState;
use crate::orders::{
    OrderDetail, OrderPipeline, UpdatePaymentStatusRequest, UpdateStatusRequest,
};

pub fn router() -> Router<ServerState> {
    Router::new()
        // Products - ownership-scoped
        .route("/api/admin/products", get(list_products).post(create_product))
        .route(
            "/api/admin/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        // Categories - admin only
        .route("/api/admin/categories", post(create_category))
        .route("/api/admin/categories/{id}", delete(delete_category))
        // Orders - admin only
        .route("/api/admin/orders", get(list_orders))
        .route("/api/admin/orders/{id}", get(get_order))
        .route("/api/admin/orders/{id}/status", put(update_status))
        .route(
            "/api/admin/orders/{id}/payment-status",
            put(update_payment_status),
        )
        // Customers and dashboard - admin only
        .route("/api/admin/customers", get(list_customers))
        .route("/api/admin/dashboard", get(dashboard))
        .route("/api/admin/dashboard/top-products", get(top_products))
}

// ==================== Products ====================

/// GET /api/admin/products - products visible to the caller
async fn list_products(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let products = AdminAccessLayer::new(&state).list_products(&ctx).await?;
    Ok(ApiResponse::ok(products))
}

/// GET /api/admin/products/{id}
async fn get_product(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Product>> {
    let product = AdminAccessLayer::new(&state).get_product(&ctx, id).await?;
    Ok(ApiResponse::ok(product))
}

/// POST /api/admin/products - create, owner stamped from the caller
async fn create_product(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    Json(payload): Json<ProductCreate>,
) -> AppResult<ApiResponse<Product>> {
    let product = AdminAccessLayer::new(&state)
        .create_product(&ctx, payload)
        .await?;
    Ok(ApiResponse::ok_with_message(product, "Product created"))
}

/// PUT /api/admin/products/{id}
async fn update_product(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<ApiResponse<Product>> {
    let product = AdminAccessLayer::new(&state)
        .update_product(&ctx, id, payload)
        .await?;
    Ok(ApiResponse::ok(product))
}

/// DELETE /api/admin/products/{id}
async fn delete_product(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    AdminAccessLayer::new(&state).delete_product(&ctx, id).await?;
    Ok(ApiResponse::ok_message("Product deleted"))
}

// ==================== Categories ====================

/// POST /api/admin/categories
async fn create_category(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<ApiResponse<Category>> {
    let category = AdminAccessLayer::new(&state)
        .create_category(&ctx, payload)
        .await?;
    Ok(ApiResponse::ok_with_message(category, "Category created"))
}

/// DELETE /api/admin/categories/{id} - refused while in use
async fn delete_category(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    AdminAccessLayer::new(&state)
        .delete_category(&ctx, id)
        .await?;
    Ok(ApiResponse::ok_message("Category deleted"))
}

// ==================== Orders ====================

/// GET /api/admin/orders?page=&page_size=&status=&user_id= - paged, newest first
async fn list_orders(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    Query(query): Query<OrderListQuery>,
) -> AppResult<ApiResponse<OrderPage>> {
    let page = AdminAccessLayer::new(&state).list_orders(&ctx, query).await?;
    Ok(ApiResponse::ok(page))
}

/// GET /api/admin/orders/{id}
async fn get_order(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<OrderDetail>> {
    OwnershipGuard::require_admin(&ctx)?;
    let detail = OrderPipeline::new(&state).get_order(&ctx, id).await?;
    Ok(ApiResponse::ok(detail))
}

/// PUT /api/admin/orders/{id}/status - adjacency enforced
async fn update_status(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<ApiResponse<Order>> {
    let order = OrderPipeline::new(&state)
        .update_status(&ctx, id, payload.status)
        .await?;
    Ok(ApiResponse::ok_with_message(order, "Order status updated"))
}

/// PUT /api/admin/orders/{id}/payment-status
async fn update_payment_status(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePaymentStatusRequest>,
) -> AppResult<ApiResponse<Order>> {
    let order = OrderPipeline::new(&state)
        .update_payment_status(&ctx, id, payload.payment_status)
        .await?;
    Ok(ApiResponse::ok(order))
}

// ==================== Customers & Dashboard ====================

/// GET /api/admin/customers - customers with order totals
async fn list_customers(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
) -> AppResult<ApiResponse<Vec<CustomerSummary>>> {
    let customers = AdminAccessLayer::new(&state).list_customers(&ctx).await?;
    Ok(ApiResponse::ok(customers))
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    period: Option<StatsPeriod>,
}

/// GET /api/admin/dashboard?period=today|week|month
async fn dashboard(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    Query(query): Query<DashboardQuery>,
) -> AppResult<ApiResponse<DashboardStats>> {
    let stats = AdminAccessLayer::new(&state)
        .dashboard(&ctx, query.period.unwrap_or_default())
        .await?;
    Ok(ApiResponse::ok(stats))
}

#[derive(Debug, Deserialize)]
struct TopProductsQuery {
    limit: Option<usize>,
}

/// GET /api/admin/dashboard/top-products?limit= - best sellers
async fn top_products(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    Query(query): Query<TopProductsQuery>,
) -> AppResult<ApiResponse<Vec<TopProduct>>> {
    let top = AdminAccessLayer::new(&state)
        .top_products(&ctx, query.limit.unwrap_or(5))
        .await?;
    Ok(ApiResponse::ok(top))
}
