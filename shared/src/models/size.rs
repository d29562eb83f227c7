//! Size Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Size lookup entity (S, M, L)
///
/// Read-only after startup. Order lines store a denormalized copy of
/// the code and delta, never a live reference, so later edits cannot
/// alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Size {
    pub id: i64,
    /// Short code used by requests ("S", "M", "L")
    pub code: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub additional_price: Decimal,
}
