//! HTTP API
//!
//! Routes grouped by surface, each module exposing its own `router()`.
//! All responses use the [`shared::ApiResponse`] envelope.

pub mod admin;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;

use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Storefront - public
        .merge(products::router())
        // Cart - user or session scoped
        .merge(cart::router())
        // Orders - checkout and history
        .merge(orders::router())
        // Admin surface
        .merge(admin::router())
        // Health - public
        .merge(health::router())
}

/// Build the fully configured application
///
/// Used by both the HTTP server and the integration tests.
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(1024))
        .with_state(state)
}
