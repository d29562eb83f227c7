//! Storefront API Handlers
//!
//! Public menu browsing. Only available products are exposed here; the
//! full catalog (including hidden products) lives on the admin surface.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use shared::models::{Category, Product};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::admin::AdminAccessLayer;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/products", get(list))
        .route("/api/products/{id}", get(get_by_id))
        .route("/api/products/by-category/{slug}", get(by_category))
        .route("/api/categories", get(categories))
}

/// GET /api/products - available products
async fn list(State(state): State<ServerState>) -> ApiResponse<Vec<Product>> {
    let products = state
        .store
        .read(|t| {
            t.products
                .values()
                .filter(|p| p.is_available)
                .cloned()
                .collect::<Vec<_>>()
        })
        .await;
    ApiResponse::ok(products)
}

/// GET /api/products/{id} - single product
async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Product>> {
    let product = state
        .store
        .read(|t| t.product(id).cloned())
        .await
        .map_err(|_| AppError::new(ErrorCode::ProductNotFound))?;
    if !product.is_available {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }
    Ok(ApiResponse::ok(product))
}

/// GET /api/products/by-category/{slug} - available products in one category
async fn by_category(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let products = state
        .store
        .read(|t| {
            let category = t
                .categories
                .values()
                .find(|c| c.slug == slug && c.is_active)?;
            Some(
                t.products
                    .values()
                    .filter(|p| p.category_id == category.id && p.is_available)
                    .cloned()
                    .collect::<Vec<_>>(),
            )
        })
        .await
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    Ok(ApiResponse::ok(products))
}

/// GET /api/categories - active categories in display order
async fn categories(State(state): State<ServerState>) -> ApiResponse<Vec<Category>> {
    let categories = AdminAccessLayer::new(&state)
        .list_categories()
        .await
        .into_iter()
        .filter(|c| c.is_active)
        .collect();
    ApiResponse::ok(categories)
}
