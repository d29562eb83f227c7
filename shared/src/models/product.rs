//! Product Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
///
/// `owner_id` identifies the user who created the product and is the
/// basis for row-level access scoping. It is stamped at creation time
/// and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    pub category_id: i64,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Create product payload
///
/// No `owner_id` field: the server stamps it from the caller identity,
/// clients cannot set it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    pub category_id: i64,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

/// Update product payload (partial; `owner_id` is not updatable)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub base_price: Option<Decimal>,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

fn default_true() -> bool {
    true
}
