//! Shared types for the beverage ordering platform
//!
//! This crate holds everything both the server and its tests agree on:
//!
//! - **Models** (`models`): products, categories, carts, orders and the
//!   lookup tables (sizes, toppings) they reference
//! - **Errors** (`error`): unified error codes, `AppError` and `AppResult`
//! - **Response** (`response`): the uniform API response envelope

pub mod error;
pub mod models;
pub mod response;

// Re-export the types almost every caller needs
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use response::ApiResponse;
