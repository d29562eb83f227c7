//! Order API Handlers
//!
//! Checkout and order history for customers and guests. Admin-side
//! order management lives on the admin surface.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use http::HeaderMap;
use shared::models::Order;
use shared::{ApiResponse, AppResult};

use crate::api::cart::cart_scope;
use crate::auth::OwnershipContext;
use crate::core::ServerState;
use crate::orders::{CheckoutResponse, CreateOrderRequest, OrderDetail, OrderPipeline};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", post(create).get(list))
        .route("/api/orders/{id}", get(get_by_id))
}

/// POST /api/orders - checkout the caller's cart
async fn create(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    headers: HeaderMap,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let scope = cart_scope(&ctx, &headers)?;
    let response = OrderPipeline::new(&state)
        .create_order(&ctx, &scope, payload)
        .await?;
    Ok(ApiResponse::ok_with_message(response, "Order placed"))
}

/// GET /api/orders - the caller's order history, newest first
async fn list(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let orders = OrderPipeline::new(&state).list_orders(&ctx).await?;
    Ok(ApiResponse::ok(orders))
}

/// GET /api/orders/{id} - one order with its lines, ownership-checked
async fn get_by_id(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<OrderDetail>> {
    let detail = OrderPipeline::new(&state).get_order(&ctx, id).await?;
    Ok(ApiResponse::ok(detail))
}
