//! Voucher catalog

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::policy::round_money;

/// A discount voucher
///
/// Every variant carries the minimum subtotal it requires. Validity is
/// checked against the subtotal before shipping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Voucher {
    /// Percentage off the subtotal
    Percentage { percent: Decimal, min_order: Decimal },
    /// Fixed amount off, never more than the subtotal itself
    FixedAmount { amount: Decimal, min_order: Decimal },
    /// Shipping fee waived, no subtotal discount
    FreeShipping { min_order: Decimal },
}

impl Voucher {
    /// Minimum subtotal this voucher requires
    pub fn min_order(&self) -> Decimal {
        match self {
            Self::Percentage { min_order, .. }
            | Self::FixedAmount { min_order, .. }
            | Self::FreeShipping { min_order } => *min_order,
        }
    }

    /// Whether the voucher applies to the given subtotal
    pub fn is_valid(&self, subtotal: Decimal) -> bool {
        subtotal >= self.min_order()
    }

    /// Subtotal discount granted for the given subtotal
    ///
    /// Zero when the voucher does not apply. A fixed amount is capped
    /// at the subtotal so the discount can never exceed it.
    pub fn discount(&self, subtotal: Decimal) -> Decimal {
        if !self.is_valid(subtotal) {
            return Decimal::ZERO;
        }
        match self {
            Self::Percentage { percent, .. } => {
                round_money(subtotal * *percent / Decimal::ONE_HUNDRED)
            }
            Self::FixedAmount { amount, .. } => (*amount).min(subtotal),
            Self::FreeShipping { .. } => Decimal::ZERO,
        }
    }

    /// Whether shipping is waived for the given subtotal
    pub fn grants_free_shipping(&self, subtotal: Decimal) -> bool {
        matches!(self, Self::FreeShipping { .. }) && self.is_valid(subtotal)
    }

    /// Human description of what the voucher grants
    pub fn message(&self) -> String {
        match self {
            Self::Percentage { percent, .. } => format!("{percent}% off"),
            Self::FixedAmount { amount, .. } => format!("{amount} off"),
            Self::FreeShipping { .. } => "free shipping".to_string(),
        }
    }
}

/// In-memory voucher lookup, keyed by normalized code
///
/// Codes are matched after trimming and uppercasing, so user input like
/// `" giam10 "` resolves. Unknown codes resolve to `None` and the order
/// proceeds without a discount.
#[derive(Debug, Clone, Default)]
pub struct VoucherCatalog {
    vouchers: HashMap<String, Voucher>,
}

impl VoucherCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the standing campaign codes
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            "GIAM10",
            Voucher::Percentage {
                percent: Decimal::from(10),
                min_order: Decimal::ZERO,
            },
        );
        catalog.insert(
            "GIAM15",
            Voucher::Percentage {
                percent: Decimal::from(15),
                min_order: Decimal::from(100_000),
            },
        );
        catalog.insert(
            "GIAM20",
            Voucher::Percentage {
                percent: Decimal::from(20),
                min_order: Decimal::from(200_000),
            },
        );
        catalog.insert(
            "FREESHIP",
            Voucher::FreeShipping {
                min_order: Decimal::from(50_000),
            },
        );
        catalog.insert(
            "NEWUSER",
            Voucher::FixedAmount {
                amount: Decimal::from(30_000),
                min_order: Decimal::ZERO,
            },
        );
        catalog
    }

    pub fn insert(&mut self, code: &str, voucher: Voucher) {
        self.vouchers.insert(Self::normalize(code), voucher);
    }

    /// Look up a voucher by user-supplied code
    pub fn resolve(&self, code: &str) -> Option<&Voucher> {
        let normalized = Self::normalize(code);
        if normalized.is_empty() {
            return None;
        }
        self.vouchers.get(&normalized)
    }

    fn normalize(code: &str) -> String {
        code.trim().to_ascii_uppercase()
    }
}
