//! Cart API Handlers
//!
//! Authenticated callers get a user-scoped cart. Anonymous callers must
//! send an `x-session-id` header; without either the cart has no scope
//! and the request is refused.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use http::HeaderMap;
use serde::Deserialize;
use shared::models::{CartLine, CartScope};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::auth::OwnershipContext;
use crate::cart::{AddItemRequest, CartService, CartSummary, UpdateQuantityRequest};
use crate::core::ServerState;

const SESSION_HEADER: &str = "x-session-id";

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/cart", get(summary))
        .route("/api/cart", delete(clear))
        .route("/api/cart/items", post(add_item))
        .route("/api/cart/items/{id}", put(update_quantity))
        .route("/api/cart/items/{id}", delete(remove_item))
}

#[derive(Debug, Deserialize)]
struct SummaryQuery {
    voucher: Option<String>,
}

/// Resolve the cart scope for this request
pub(crate) fn cart_scope(ctx: &OwnershipContext, headers: &HeaderMap) -> AppResult<CartScope> {
    if let Some(user_id) = ctx.user_id {
        return Ok(CartScope::User(user_id));
    }
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| CartScope::Session(s.to_string()))
        .ok_or_else(|| AppError::new(ErrorCode::CartScopeMissing))
}

/// GET /api/cart - cart contents with checkout totals
async fn summary(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    headers: HeaderMap,
    Query(query): Query<SummaryQuery>,
) -> AppResult<ApiResponse<CartSummary>> {
    let scope = cart_scope(&ctx, &headers)?;
    let summary = CartService::new(&state)
        .summary(&scope, query.voucher.as_deref())
        .await?;
    Ok(ApiResponse::ok(summary))
}

/// POST /api/cart/items - add an item
async fn add_item(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    headers: HeaderMap,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<ApiResponse<CartLine>> {
    let scope = cart_scope(&ctx, &headers)?;
    let line = CartService::new(&state).add_item(&scope, payload).await?;
    Ok(ApiResponse::ok_with_message(line, "Item added to cart"))
}

/// PUT /api/cart/items/{id} - change quantity (0 is a no-op)
async fn update_quantity(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<ApiResponse<CartLine>> {
    let scope = cart_scope(&ctx, &headers)?;
    let line = CartService::new(&state)
        .update_quantity(&scope, id, payload.quantity)
        .await?;
    Ok(ApiResponse::ok(line))
}

/// DELETE /api/cart/items/{id} - remove a line
async fn remove_item(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    let scope = cart_scope(&ctx, &headers)?;
    CartService::new(&state).remove_item(&scope, id).await?;
    Ok(ApiResponse::ok_message("Item removed"))
}

/// DELETE /api/cart - empty the cart
async fn clear(
    State(state): State<ServerState>,
    ctx: OwnershipContext,
    headers: HeaderMap,
) -> AppResult<ApiResponse<()>> {
    let scope = cart_scope(&ctx, &headers)?;
    CartService::new(&state).clear(&scope).await?;
    Ok(ApiResponse::ok_message("Cart cleared"))
}
