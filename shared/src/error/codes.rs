//! Unified error codes for the ordering platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Cart errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use super::category::ErrorCategory;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// Caller carries no identity context
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Caller identity present but does not own the resource
    OwnershipViolation = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no line items
    EmptyOrder = 4002,
    /// Quantity must be a positive integer
    InvalidQuantity = 4003,
    /// Requested order status transition is not allowed
    InvalidStatusTransition = 4004,
    /// Requested payment status transition is not allowed
    InvalidPaymentTransition = 4005,

    // ==================== 5xxx: Cart ====================
    /// Cart line not found
    CartLineNotFound = 5001,
    /// Cart is neither user- nor session-scoped
    CartScopeMissing = 5002,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product exists but is not available for sale
    ProductUnavailable = 6002,
    /// Category not found
    CategoryNotFound = 6003,
    /// Category still referenced by products
    CategoryInUse = 6004,
    /// Size code not found
    SizeNotFound = 6005,
    /// Topping not found
    ToppingNotFound = 6006,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Storage layer error
    DatabaseError = 9002,
    /// Transaction could not be committed; all changes rolled back
    TransactionFailure = 9003,
}

impl ErrorCode {
    /// Numeric value of the code
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Category this code belongs to, derived from its numeric band
    pub fn category(&self) -> ErrorCategory {
        match self.code() {
            0..=999 => ErrorCategory::General,
            1000..=1999 => ErrorCategory::Auth,
            2000..=2999 => ErrorCategory::Permission,
            4000..=4999 => ErrorCategory::Order,
            5000..=5999 => ErrorCategory::Cart,
            6000..=6999 => ErrorCategory::Catalog,
            _ => ErrorCategory::System,
        }
    }

    /// Default human-readable message for the code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::NotAuthenticated => "Not authenticated",
            Self::PermissionDenied => "Permission denied",
            Self::OwnershipViolation => "Access denied: resource belongs to another owner",
            Self::AdminRequired => "Admin role required",
            Self::OrderNotFound => "Order not found",
            Self::EmptyOrder => "Order must contain at least one item",
            Self::InvalidQuantity => "Quantity must be a positive integer",
            Self::InvalidStatusTransition => "Order status transition not allowed",
            Self::InvalidPaymentTransition => "Payment status transition not allowed",
            Self::CartLineNotFound => "Cart item not found",
            Self::CartScopeMissing => "Cart requires a user id or session id",
            Self::ProductNotFound => "Product not found",
            Self::ProductUnavailable => "Product is not available",
            Self::CategoryNotFound => "Category not found",
            Self::CategoryInUse => "Category still has products",
            Self::SizeNotFound => "Size not found",
            Self::ToppingNotFound => "Topping not found",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Storage error",
            Self::TransactionFailure => "Transaction failed and was rolled back",
        }
    }

    /// HTTP status code this error maps to
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::EmptyOrder
            | Self::InvalidQuantity
            | Self::InvalidStatusTransition
            | Self::InvalidPaymentTransition
            | Self::CartScopeMissing => StatusCode::BAD_REQUEST,
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied | Self::OwnershipViolation | Self::AdminRequired => {
                StatusCode::FORBIDDEN
            }
            Self::NotFound
            | Self::OrderNotFound
            | Self::CartLineNotFound
            | Self::ProductNotFound
            | Self::CategoryNotFound
            | Self::SizeNotFound
            | Self::ToppingNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::CategoryInUse => StatusCode::CONFLICT,
            Self::ProductUnavailable => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::TransactionFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            1001 => Self::NotAuthenticated,
            2001 => Self::PermissionDenied,
            2002 => Self::OwnershipViolation,
            2003 => Self::AdminRequired,
            4001 => Self::OrderNotFound,
            4002 => Self::EmptyOrder,
            4003 => Self::InvalidQuantity,
            4004 => Self::InvalidStatusTransition,
            4005 => Self::InvalidPaymentTransition,
            5001 => Self::CartLineNotFound,
            5002 => Self::CartScopeMissing,
            6001 => Self::ProductNotFound,
            6002 => Self::ProductUnavailable,
            6003 => Self::CategoryNotFound,
            6004 => Self::CategoryInUse,
            6005 => Self::SizeNotFound,
            6006 => Self::ToppingNotFound,
            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::TransactionFailure,
            other => return Err(format!("unknown error code: {}", other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::OwnershipViolation,
            ErrorCode::EmptyOrder,
            ErrorCode::ProductNotFound,
            ErrorCode::TransactionFailure,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_categories_follow_bands() {
        assert_eq!(ErrorCode::NotFound.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::NotAuthenticated.category(), ErrorCategory::Auth);
        assert_eq!(
            ErrorCode::OwnershipViolation.category(),
            ErrorCategory::Permission
        );
        assert_eq!(ErrorCode::EmptyOrder.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::CartLineNotFound.category(), ErrorCategory::Cart);
        assert_eq!(ErrorCode::SizeNotFound.category(), ErrorCategory::Catalog);
        assert_eq!(
            ErrorCode::TransactionFailure.category(),
            ErrorCategory::System
        );
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::OwnershipViolation.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::ProductNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ErrorCode::EmptyOrder.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::CategoryInUse.http_status(),
            StatusCode::CONFLICT
        );
    }
}
