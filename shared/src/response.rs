//! API Response types
//!
//! Standardized response envelope for the entire platform.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Unified API response structure
///
/// All API responses follow this format:
/// ```json
/// {
///     "success": true,
///     "message": "Success",
///     "data": { ... }
/// }
/// ```
///
/// Failures carry `success: false`, a human-readable message and an
/// optional list of error strings (field errors, audit context).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: "Success".to_string(),
            data: Some(data),
            errors: None,
        }
    }

    /// Create a successful response with custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }

    /// Create an error response from a message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    /// Create an error response from an [`AppError`], flattening its
    /// details into the `errors` list
    pub fn failure(err: &AppError) -> Self {
        let errors = err.details.as_ref().map(|details| {
            let mut entries: Vec<String> = details
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect();
            entries.sort();
            entries
        });

        Self {
            success: false,
            message: err.message.clone(),
            data: None,
            errors,
        }
    }
}

impl ApiResponse<()> {
    /// Create a successful response without data
    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            errors: None,
        }
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        Json(self).into_response()
    }
}
