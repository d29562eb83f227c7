//! Pricing policy and voucher catalog
//!
//! All money math lives here: unit prices with size and topping deltas,
//! promotional strategies, the shipping step function and voucher
//! discounts. Callers never add price components up themselves.

mod policy;
mod voucher;

pub use policy::{PricingPolicy, PricingStrategy};
pub use voucher::{Voucher, VoucherCatalog};
