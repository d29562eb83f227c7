//! Cart Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Who a cart belongs to: an authenticated user or an anonymous session
///
/// Exactly one of the two is ever set on a [`CartLine`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartScope {
    User(i64),
    Session(String),
}

/// Cart line entity
///
/// Product name, image and unit price are a snapshot taken at add time
/// (unit price already includes size and topping deltas). Later product
/// edits do not touch existing lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub id: i64,
    pub user_id: Option<i64>,
    pub session_id: Option<String>,
    pub product_id: i64,
    pub product_name: String,
    pub image_url: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub quantity: u32,
    pub size: Option<String>,
    pub sugar_level: Option<String>,
    pub ice_level: Option<String>,
    /// Selected topping ids, kept sorted so merge comparison is
    /// order-insensitive
    pub toppings: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

impl CartLine {
    /// Scope this line belongs to
    pub fn scope(&self) -> Option<CartScope> {
        match (&self.user_id, &self.session_id) {
            (Some(uid), _) => Some(CartScope::User(*uid)),
            (None, Some(sid)) => Some(CartScope::Session(sid.clone())),
            (None, None) => None,
        }
    }

    /// Whether another selection is the same merge key:
    /// (product, size, sugar, ice, topping-set)
    pub fn same_selection(
        &self,
        product_id: i64,
        size: &Option<String>,
        sugar_level: &Option<String>,
        ice_level: &Option<String>,
        toppings: &[i64],
    ) -> bool {
        self.product_id == product_id
            && self.size == *size
            && self.sugar_level == *sugar_level
            && self.ice_level == *ice_level
            && self.toppings == toppings
    }

    /// Line total = unit price × quantity
    pub fn total_price(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
