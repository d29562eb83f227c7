//! Order Server - online beverage ordering platform
//!
//! # Architecture overview
//!
//! - **Pricing** (`pricing`): pricing policy (size/topping deltas,
//!   shipping step function, promotional strategies) and voucher catalog
//! - **Ownership** (`auth`): per-request identity context and the
//!   ownership guard consulted before any scoped read or mutation
//! - **Storage** (`db`): in-memory transactional store behind the
//!   repository surface
//! - **Order pipeline** (`orders`): transactional order creation and
//!   the status lifecycle
//! - **Cart** (`cart`): session/owner-scoped pending line items
//! - **Admin** (`admin`): ownership-guarded CRUD and dashboard queries
//! - **HTTP API** (`api`): axum routes and handlers
//!
//! # Module structure
//!
//! ```text
//! order-server/src/
//! ├── core/          # Config, state, server
//! ├── common/        # Logging infrastructure
//! ├── auth/          # Identity context, extractor, ownership guard
//! ├── db/            # In-memory transactional store + seed data
//! ├── pricing/       # Pricing policy and voucher catalog
//! ├── cart/          # Cart aggregate
//! ├── orders/        # Order pipeline
//! ├── admin/         # Admin access layer
//! └── api/           # HTTP routes and handlers
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod common;
pub mod core;
pub mod db;
pub mod orders;
pub mod pricing;

// Re-export public types
pub use auth::{OwnershipContext, OwnershipGuard, ScopeFilter};
pub use core::{Config, Server, ServerState};
pub use pricing::{PricingPolicy, VoucherCatalog};

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCode};
