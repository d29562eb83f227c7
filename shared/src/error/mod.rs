//! Unified error handling
//!
//! Error codes, categories and the `AppError` type used across the
//! whole platform. HTTP integration lives in `types` so handlers can
//! return `AppResult<T>` directly.

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{AppError, AppResult};
