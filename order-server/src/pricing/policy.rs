//! Pricing policy

use chrono::NaiveTime;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::models::{Product, Size, Topping};
use shared::{AppError, AppResult, ErrorCode};

use crate::core::Config;

/// How a unit price is adjusted before line totals are computed
///
/// All strategies share the same inputs so the pipeline can swap them
/// without touching the rest of the calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingStrategy {
    /// No adjustment
    #[default]
    Standard,
    /// Flat percentage off, any time of day
    Promotional { percent: Decimal },
    /// Percentage off only inside the configured happy-hour window
    HappyHour { percent: Decimal },
}

/// Order pricing rules
///
/// Thresholds and the happy-hour window come from [`Config`] so they
/// can be tuned per deployment without a rebuild.
#[derive(Debug, Clone)]
pub struct PricingPolicy {
    free_shipping_threshold: Decimal,
    flat_shipping_fee: Decimal,
    happy_hour_start: NaiveTime,
    happy_hour_end: NaiveTime,
    happy_hour_discount_percent: Decimal,
}

impl PricingPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            free_shipping_threshold: config.free_shipping_threshold,
            flat_shipping_fee: config.flat_shipping_fee,
            happy_hour_start: config.happy_hour_start,
            happy_hour_end: config.happy_hour_end,
            happy_hour_discount_percent: config.happy_hour_discount_percent,
        }
    }

    /// Strategy the deployment runs with
    ///
    /// Happy hour when a discount percent is configured, standard
    /// pricing otherwise. Cart summaries and checkout both quote
    /// through this so the two never disagree.
    pub fn default_strategy(&self) -> PricingStrategy {
        if self.happy_hour_discount_percent > Decimal::ZERO {
            PricingStrategy::HappyHour {
                percent: self.happy_hour_discount_percent,
            }
        } else {
            PricingStrategy::Standard
        }
    }

    /// Unit price = base price + size delta + sum of topping prices
    pub fn unit_price(&self, product: &Product, size: Option<&Size>, toppings: &[Topping]) -> Decimal {
        let size_delta = size.map(|s| s.additional_price).unwrap_or_default();
        let toppings_total: Decimal = toppings.iter().map(|t| t.price).sum();
        product.base_price + size_delta + toppings_total
    }

    /// Apply a pricing strategy to a unit price
    ///
    /// `at` is the local time of day the price is being quoted, injected
    /// by the caller so the window check stays testable.
    pub fn adjusted_unit_price(
        &self,
        strategy: PricingStrategy,
        unit_price: Decimal,
        at: NaiveTime,
    ) -> Decimal {
        let percent = match strategy {
            PricingStrategy::Standard => return unit_price,
            PricingStrategy::Promotional { percent } => percent,
            PricingStrategy::HappyHour { percent } => {
                if !self.happy_hour_active(at) {
                    return unit_price;
                }
                percent
            }
        };
        let discounted = unit_price * (Decimal::ONE_HUNDRED - percent) / Decimal::ONE_HUNDRED;
        round_money(discounted)
    }

    /// Whether `at` falls inside the happy-hour window (start inclusive,
    /// end exclusive)
    pub fn happy_hour_active(&self, at: NaiveTime) -> bool {
        at >= self.happy_hour_start && at < self.happy_hour_end
    }

    /// Line total = unit price × quantity; zero quantity is refused
    pub fn line_total(&self, unit_price: Decimal, quantity: u32) -> AppResult<Decimal> {
        if quantity == 0 {
            return Err(AppError::new(ErrorCode::InvalidQuantity));
        }
        Ok(unit_price * Decimal::from(quantity))
    }

    /// Shipping fee step function: free at or above the threshold,
    /// otherwise the flat fee
    pub fn shipping_fee(&self, subtotal: Decimal) -> Decimal {
        if subtotal >= self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping_fee
        }
    }
}

/// Round to 2 decimal places, midpoint away from zero
pub(crate) fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn policy() -> PricingPolicy {
        PricingPolicy {
            free_shipping_threshold: Decimal::from(100_000),
            flat_shipping_fee: Decimal::from(20_000),
            happy_hour_start: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            happy_hour_end: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            happy_hour_discount_percent: Decimal::ZERO,
        }
    }

    fn product(base: i64) -> Product {
        Product {
            id: 1,
            name: "Trà Sữa Truyền Thống".to_string(),
            description: None,
            base_price: Decimal::from(base),
            category_id: 1,
            image_url: None,
            is_available: true,
            owner_id: 1,
            created_at: Utc::now(),
        }
    }

    fn size_l() -> Size {
        Size {
            id: 3,
            code: "L".to_string(),
            name: "Lớn".to_string(),
            additional_price: Decimal::from(10_000),
        }
    }

    fn topping(price: i64) -> Topping {
        Topping {
            id: 1,
            name: "Trân Châu Đen".to_string(),
            price: Decimal::from(price),
            is_available: true,
        }
    }

    #[test]
    fn unit_price_adds_size_and_toppings() {
        let p = policy();
        let unit = p.unit_price(&product(35_000), Some(&size_l()), &[topping(8_000)]);
        assert_eq!(unit, Decimal::from(53_000));
    }

    #[test]
    fn unit_price_without_options_is_base() {
        let p = policy();
        assert_eq!(p.unit_price(&product(35_000), None, &[]), Decimal::from(35_000));
    }

    #[test]
    fn line_total_multiplies_by_quantity() {
        let p = policy();
        assert_eq!(
            p.line_total(Decimal::from(53_000), 2).unwrap(),
            Decimal::from(106_000)
        );
    }

    #[test]
    fn zero_quantity_is_refused() {
        let p = policy();
        let err = p.line_total(Decimal::from(53_000), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
    }

    #[test]
    fn shipping_free_at_threshold() {
        let p = policy();
        assert_eq!(p.shipping_fee(Decimal::from(99_999)), Decimal::from(20_000));
        assert_eq!(p.shipping_fee(Decimal::from(100_000)), Decimal::ZERO);
        assert_eq!(p.shipping_fee(Decimal::from(106_000)), Decimal::ZERO);
    }

    #[test]
    fn promotional_strategy_discounts_any_time() {
        let p = policy();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let adjusted = p.adjusted_unit_price(
            PricingStrategy::Promotional {
                percent: Decimal::from(20),
            },
            Decimal::from(50_000),
            noon,
        );
        assert_eq!(adjusted, Decimal::from(40_000));
    }

    #[test]
    fn happy_hour_only_inside_window() {
        let p = policy();
        let strategy = PricingStrategy::HappyHour {
            percent: Decimal::from(10),
        };
        let inside = NaiveTime::from_hms_opt(15, 0, 0).unwrap();
        let outside = NaiveTime::from_hms_opt(16, 0, 0).unwrap();

        assert_eq!(
            p.adjusted_unit_price(strategy, Decimal::from(50_000), inside),
            Decimal::from(45_000)
        );
        // End boundary is exclusive
        assert_eq!(
            p.adjusted_unit_price(strategy, Decimal::from(50_000), outside),
            Decimal::from(50_000)
        );
        // Start boundary is inclusive
        let start = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        assert_eq!(
            p.adjusted_unit_price(strategy, Decimal::from(50_000), start),
            Decimal::from(45_000)
        );
    }

    #[test]
    fn default_strategy_follows_the_configured_percent() {
        let mut p = policy();
        assert_eq!(p.default_strategy(), PricingStrategy::Standard);

        p.happy_hour_discount_percent = Decimal::from(10);
        assert_eq!(
            p.default_strategy(),
            PricingStrategy::HappyHour {
                percent: Decimal::from(10)
            }
        );
    }

    #[test]
    fn discounts_round_half_up_to_two_places() {
        let p = policy();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        // 33333 * 0.85 = 28333.05
        let adjusted = p.adjusted_unit_price(
            PricingStrategy::Promotional {
                percent: Decimal::from(15),
            },
            Decimal::from(33_333),
            noon,
        );
        assert_eq!(adjusted, Decimal::new(2_833_305, 2));
    }
}
