//! Cart aggregate
//!
//! Pending line items scoped to a user or an anonymous session. Lines
//! carry a snapshot of the product and its computed unit price taken at
//! add time; later product edits do not change a cart.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{CartLine, CartScope};
use shared::{AppError, AppResult, ErrorCode};
use std::sync::Arc;
use validator::Validate;

use crate::core::ServerState;
use crate::db::MemoryStore;
use crate::pricing::{PricingPolicy, PricingStrategy, VoucherCatalog};

/// Add-to-cart payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddItemRequest {
    pub product_id: i64,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    /// Size code ("S", "M", "L"); absent means base size
    pub size: Option<String>,
    pub sugar_level: Option<String>,
    pub ice_level: Option<String>,
    #[serde(default)]
    pub toppings: Vec<i64>,
}

/// Update-quantity payload
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

/// Cart contents with the same totals an order would be priced at
#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Advisory text when a voucher code was given but did not apply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voucher_message: Option<String>,
}

/// Cart operations for one scope
#[derive(Clone)]
pub struct CartService {
    store: MemoryStore,
    pricing: Arc<PricingPolicy>,
    vouchers: Arc<VoucherCatalog>,
    strategy: PricingStrategy,
}

impl CartService {
    pub fn new(state: &ServerState) -> Self {
        Self {
            store: state.store.clone(),
            pricing: state.pricing.clone(),
            vouchers: state.vouchers.clone(),
            strategy: state.pricing.default_strategy(),
        }
    }

    /// Add an item to the cart
    ///
    /// A line with the same selection tuple (product, size, sugar, ice,
    /// topping set) is merged by bumping its quantity; anything else
    /// becomes a new line.
    pub async fn add_item(&self, scope: &CartScope, req: AddItemRequest) -> AppResult<CartLine> {
        req.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let mut topping_ids = req.toppings.clone();
        topping_ids.sort_unstable();
        topping_ids.dedup();

        let pricing = self.pricing.clone();
        let scope = scope.clone();
        self.store
            .transaction(move |t| -> AppResult<CartLine> {
                let product = t
                    .product(req.product_id)
                    .map_err(|_| AppError::new(ErrorCode::ProductNotFound))?
                    .clone();
                if !product.is_available {
                    return Err(AppError::new(ErrorCode::ProductUnavailable));
                }

                let size = match &req.size {
                    Some(code) => Some(
                        t.size_by_code(code)
                            .ok_or_else(|| AppError::new(ErrorCode::SizeNotFound))?
                            .clone(),
                    ),
                    None => None,
                };
                let mut toppings = Vec::with_capacity(topping_ids.len());
                for id in &topping_ids {
                    let topping = t
                        .topping(*id)
                        .map_err(|_| AppError::new(ErrorCode::ToppingNotFound))?;
                    toppings.push(topping.clone());
                }

                let unit_price = pricing.unit_price(&product, size.as_ref(), &toppings);

                // Merge into an existing line with the same selection
                let existing = t
                    .cart_lines
                    .values()
                    .find(|line| {
                        line.scope().as_ref() == Some(&scope)
                            && line.same_selection(
                                req.product_id,
                                &req.size,
                                &req.sugar_level,
                                &req.ice_level,
                                &topping_ids,
                            )
                    })
                    .map(|line| line.id);

                if let Some(id) = existing {
                    let line = t
                        .cart_lines
                        .get_mut(&id)
                        .ok_or_else(|| AppError::new(ErrorCode::CartLineNotFound))?;
                    line.quantity += req.quantity;
                    return Ok(line.clone());
                }

                let id = t.allocate_id();
                let (user_id, session_id) = match &scope {
                    CartScope::User(uid) => (Some(*uid), None),
                    CartScope::Session(sid) => (None, Some(sid.clone())),
                };
                let line = CartLine {
                    id,
                    user_id,
                    session_id,
                    product_id: product.id,
                    product_name: product.name.clone(),
                    image_url: product.image_url.clone(),
                    unit_price,
                    quantity: req.quantity,
                    size: req.size.clone(),
                    sugar_level: req.sugar_level.clone(),
                    ice_level: req.ice_level.clone(),
                    toppings: topping_ids.clone(),
                    created_at: Utc::now(),
                };
                t.cart_lines.insert(id, line.clone());
                Ok(line)
            })
            .await
    }

    /// Change a line's quantity
    ///
    /// Quantity zero is a deliberate no-op: the line is left untouched
    /// and removal stays an explicit, separate call.
    pub async fn update_quantity(
        &self,
        scope: &CartScope,
        line_id: i64,
        quantity: u32,
    ) -> AppResult<CartLine> {
        let scope = scope.clone();
        self.store
            .transaction(move |t| -> AppResult<CartLine> {
                let line = t
                    .cart_lines
                    .get_mut(&line_id)
                    .filter(|line| line.scope().as_ref() == Some(&scope))
                    .ok_or_else(|| AppError::new(ErrorCode::CartLineNotFound))?;
                if quantity > 0 {
                    line.quantity = quantity;
                }
                Ok(line.clone())
            })
            .await
    }

    /// Remove a line from the cart
    pub async fn remove_item(&self, scope: &CartScope, line_id: i64) -> AppResult<()> {
        let scope = scope.clone();
        self.store
            .transaction(move |t| -> AppResult<()> {
                let owned = t
                    .cart_lines
                    .get(&line_id)
                    .is_some_and(|line| line.scope().as_ref() == Some(&scope));
                if !owned {
                    return Err(AppError::new(ErrorCode::CartLineNotFound));
                }
                t.cart_lines.remove(&line_id);
                Ok(())
            })
            .await
    }

    /// Remove every line in the scope
    pub async fn clear(&self, scope: &CartScope) -> AppResult<()> {
        let scope = scope.clone();
        self.store
            .transaction(move |t| -> AppResult<()> {
                t.cart_lines
                    .retain(|_, line| line.scope().as_ref() != Some(&scope));
                Ok(())
            })
            .await
    }

    /// Price the cart exactly as checkout would
    pub async fn summary(
        &self,
        scope: &CartScope,
        voucher_code: Option<&str>,
    ) -> AppResult<CartSummary> {
        let lines = self.store.read(|t| t.cart_lines_for(scope)).await;

        // Quote each line through the active strategy, as checkout does
        let at = chrono::Local::now().time();
        let subtotal: Decimal = lines
            .iter()
            .map(|line| {
                self.pricing
                    .adjusted_unit_price(self.strategy, line.unit_price, at)
                    * Decimal::from(line.quantity)
            })
            .sum();
        let mut shipping_fee = self.pricing.shipping_fee(subtotal);
        let mut discount = Decimal::ZERO;
        let mut voucher_message = None;

        if let Some(code) = voucher_code.map(str::trim).filter(|c| !c.is_empty()) {
            match self.vouchers.resolve(code) {
                Some(voucher) if voucher.is_valid(subtotal) => {
                    discount = voucher.discount(subtotal);
                    if voucher.grants_free_shipping(subtotal) {
                        shipping_fee = Decimal::ZERO;
                    }
                }
                Some(voucher) => {
                    voucher_message = Some(format!(
                        "Voucher ({}) requires a minimum subtotal of {}",
                        voucher.message(),
                        voucher.min_order()
                    ));
                }
                None => {
                    voucher_message = Some("Voucher code not recognized".to_string());
                }
            }
        }

        let total = subtotal + shipping_fee - discount;
        Ok(CartSummary {
            lines,
            subtotal,
            shipping_fee,
            discount,
            total,
            voucher_message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;

    async fn test_state() -> ServerState {
        // Config reads the environment; tests rely on the defaults
        let config = Config::from_env();
        let state = ServerState::bare(&config);
        crate::db::seed::load_demo_data(&state.store).await;
        state
    }

    fn add_req(product_id: i64, quantity: u32, size: Option<&str>, toppings: Vec<i64>) -> AddItemRequest {
        AddItemRequest {
            product_id,
            quantity,
            size: size.map(|s| s.to_string()),
            sugar_level: None,
            ice_level: None,
            toppings,
        }
    }

    async fn seeded_ids(state: &ServerState) -> (i64, i64) {
        state
            .store
            .read(|t| {
                let product_id = t
                    .products
                    .values()
                    .find(|p| p.name == "Trà Sữa Truyền Thống")
                    .map(|p| p.id)
                    .unwrap();
                let topping_id = t
                    .toppings
                    .values()
                    .find(|tp| tp.name == "Trân Châu Đen")
                    .map(|tp| tp.id)
                    .unwrap();
                (product_id, topping_id)
            })
            .await
    }

    #[tokio::test]
    async fn add_item_snapshots_computed_unit_price() {
        let state = test_state().await;
        let cart = CartService::new(&state);
        let (product_id, topping_id) = seeded_ids(&state).await;
        let scope = CartScope::User(99);

        let line = cart
            .add_item(&scope, add_req(product_id, 2, Some("L"), vec![topping_id]))
            .await
            .unwrap();

        // 35000 base + 10000 size L + 8000 topping
        assert_eq!(line.unit_price, Decimal::from(53_000));
        assert_eq!(line.quantity, 2);
        assert_eq!(line.total_price(), Decimal::from(106_000));
    }

    #[tokio::test]
    async fn same_selection_merges_instead_of_duplicating() {
        let state = test_state().await;
        let cart = CartService::new(&state);
        let (product_id, topping_id) = seeded_ids(&state).await;
        let scope = CartScope::Session("sess-1".to_string());

        cart.add_item(&scope, add_req(product_id, 1, Some("L"), vec![topping_id]))
            .await
            .unwrap();
        let merged = cart
            .add_item(&scope, add_req(product_id, 2, Some("L"), vec![topping_id]))
            .await
            .unwrap();

        assert_eq!(merged.quantity, 3);
        let summary = cart.summary(&scope, None).await.unwrap();
        assert_eq!(summary.lines.len(), 1);
    }

    #[tokio::test]
    async fn different_size_creates_a_new_line() {
        let state = test_state().await;
        let cart = CartService::new(&state);
        let (product_id, _) = seeded_ids(&state).await;
        let scope = CartScope::User(99);

        cart.add_item(&scope, add_req(product_id, 1, Some("M"), vec![]))
            .await
            .unwrap();
        cart.add_item(&scope, add_req(product_id, 1, Some("L"), vec![]))
            .await
            .unwrap();

        let summary = cart.summary(&scope, None).await.unwrap();
        assert_eq!(summary.lines.len(), 2);
    }

    #[tokio::test]
    async fn update_quantity_zero_is_a_no_op() {
        let state = test_state().await;
        let cart = CartService::new(&state);
        let (product_id, _) = seeded_ids(&state).await;
        let scope = CartScope::User(99);

        let line = cart
            .add_item(&scope, add_req(product_id, 2, None, vec![]))
            .await
            .unwrap();
        let after = cart.update_quantity(&scope, line.id, 0).await.unwrap();
        assert_eq!(after.quantity, 2);

        let after = cart.update_quantity(&scope, line.id, 5).await.unwrap();
        assert_eq!(after.quantity, 5);
    }

    #[tokio::test]
    async fn foreign_scope_cannot_touch_lines() {
        let state = test_state().await;
        let cart = CartService::new(&state);
        let (product_id, _) = seeded_ids(&state).await;

        let line = cart
            .add_item(&CartScope::User(1), add_req(product_id, 1, None, vec![]))
            .await
            .unwrap();

        let err = cart
            .update_quantity(&CartScope::User(2), line.id, 3)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CartLineNotFound);

        let err = cart
            .remove_item(&CartScope::Session("other".into()), line.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CartLineNotFound);
    }

    #[tokio::test]
    async fn unknown_voucher_degrades_gracefully() {
        let state = test_state().await;
        let cart = CartService::new(&state);
        let (product_id, _) = seeded_ids(&state).await;
        let scope = CartScope::User(99);

        cart.add_item(&scope, add_req(product_id, 1, None, vec![]))
            .await
            .unwrap();
        let summary = cart.summary(&scope, Some("FOOBAR")).await.unwrap();

        assert_eq!(summary.discount, Decimal::ZERO);
        assert!(summary.voucher_message.is_some());
        // 35000 + 20000 shipping
        assert_eq!(summary.total, Decimal::from(55_000));
    }

    #[tokio::test]
    async fn summary_applies_percentage_voucher() {
        let state = test_state().await;
        let cart = CartService::new(&state);
        let (product_id, _) = seeded_ids(&state).await;
        let scope = CartScope::User(99);

        cart.add_item(&scope, add_req(product_id, 1, None, vec![]))
            .await
            .unwrap();
        let summary = cart.summary(&scope, Some("GIAM10")).await.unwrap();

        assert_eq!(summary.subtotal, Decimal::from(35_000));
        assert_eq!(summary.shipping_fee, Decimal::from(20_000));
        assert_eq!(summary.discount, Decimal::from(3_500));
        assert_eq!(summary.total, Decimal::from(51_500));
    }

    #[tokio::test]
    async fn unavailable_product_is_rejected() {
        let state = test_state().await;
        let cart = CartService::new(&state);
        let (product_id, _) = seeded_ids(&state).await;

        state
            .store
            .transaction(|t| -> AppResult<()> {
                if let Some(p) = t.products.get_mut(&product_id) {
                    p.is_available = false;
                }
                Ok(())
            })
            .await
            .unwrap();

        let err = cart
            .add_item(&CartScope::User(1), add_req(product_id, 1, None, vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductUnavailable);
    }
}
