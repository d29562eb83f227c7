//! Order Model
//!
//! Order header, line items and the status state machines.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order fulfillment status
///
/// Linear lifecycle: `Pending → Confirmed → Preparing → Shipping →
/// Delivered`, with `Cancelled` reachable from any non-terminal state.
/// `Delivered` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Shipping,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    ///
    /// Adjacency only: skipping forward or moving backward is refused.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == Self::Cancelled {
            return true;
        }
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Preparing)
                | (Self::Preparing, Self::Shipping)
                | (Self::Shipping, Self::Delivered)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Payment status, independent of fulfillment status
///
/// `Pending → Paid | Failed`, `Paid → Refunded`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Whether the payment state machine allows moving to `next`
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid)
                | (Self::Pending, Self::Failed)
                | (Self::Paid, Self::Refunded)
        )
    }
}

/// Payment method chosen at checkout
///
/// Recorded as a strategy name only; gateway integration is out of scope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "COD")]
    Cod,
    MoMo,
    Banking,
    #[serde(rename = "VNPay")]
    VnPay,
}

/// Order entity
///
/// Monetary fields are computed once at creation and never recomputed
/// from current prices on read: `total == subtotal + shipping_fee -
/// discount`, all four non-negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// Generated, unique, time-derived order number
    pub order_number: String,
    /// Nullable: guest checkout is allowed
    pub user_id: Option<i64>,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,

    // Customer contact snapshot, captured even for guests, immutable
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub shipping_address: String,
    pub notes: Option<String>,

    // Pricing
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Order line item
///
/// Denormalized snapshot of the product at order time; references the
/// product by id for analytics but never re-reads its current price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub image_url: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub quantity: u32,
    pub size: Option<String>,
    pub sugar_level: Option<String>,
    pub ice_level: Option<String>,
    /// Denormalized topping names
    pub toppings: Vec<String>,
    /// unit_price × quantity
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}
