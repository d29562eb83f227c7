//! Topping Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Topping lookup entity
///
/// Read-only after startup, same denormalization rule as [`crate::models::Size`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topping {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub is_available: bool,
}
