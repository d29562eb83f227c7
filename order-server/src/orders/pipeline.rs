//! Order creation and lifecycle

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{
    CartScope, Order, OrderLine, OrderStatus, PaymentMethod, PaymentStatus,
};
use shared::{AppError, AppResult, ErrorCode};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::audit_log;
use crate::auth::{OwnershipContext, OwnershipGuard, ScopeFilter};
use crate::core::ServerState;
use crate::db::MemoryStore;
use crate::pricing::{PricingPolicy, PricingStrategy, VoucherCatalog};

/// Checkout payload
///
/// Contact fields are snapshotted onto the order, also for guests. The
/// items themselves come from the caller's cart, not from the payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(length(min = 8, message = "Phone number is too short"))]
    pub customer_phone: String,
    #[validate(email(message = "Invalid email address"))]
    pub customer_email: Option<String>,
    #[validate(length(min = 1, message = "Shipping address is required"))]
    pub shipping_address: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub voucher_code: Option<String>,
}

/// Admin status-change payload
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Admin payment-status payload
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub payment_status: PaymentStatus,
}

/// Order header with its lines
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

/// Checkout result
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub order: Order,
    pub lines: Vec<OrderLine>,
    /// Advisory text when the given voucher code did not apply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voucher_message: Option<String>,
}

/// Transactional order creation and the status lifecycle
#[derive(Clone)]
pub struct OrderPipeline {
    store: MemoryStore,
    pricing: Arc<PricingPolicy>,
    vouchers: Arc<VoucherCatalog>,
    strategy: PricingStrategy,
}

impl OrderPipeline {
    pub fn new(state: &ServerState) -> Self {
        Self {
            store: state.store.clone(),
            pricing: state.pricing.clone(),
            vouchers: state.vouchers.clone(),
            strategy: state.pricing.default_strategy(),
        }
    }

    /// Pipeline with a non-standard pricing strategy (campaigns)
    pub fn with_strategy(state: &ServerState, strategy: PricingStrategy) -> Self {
        Self {
            strategy,
            ..Self::new(state)
        }
    }

    /// Create an order from the cart lines of `scope`
    ///
    /// Runs as one transaction: the order header, all lines and the
    /// cart cleanup commit together or not at all. A vanished product
    /// aborts the whole checkout; a bad voucher never does. Every line
    /// is repriced from the current product, size and topping prices;
    /// the cart's snapshot price is a display value only.
    pub async fn create_order(
        &self,
        ctx: &OwnershipContext,
        scope: &CartScope,
        req: CreateOrderRequest,
    ) -> AppResult<CheckoutResponse> {
        req.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let pricing = self.pricing.clone();
        let vouchers = self.vouchers.clone();
        let strategy = self.strategy;
        let user_id = ctx.user_id;
        let scope = scope.clone();
        let actor = ctx.actor();

        let response = self
            .store
            .transaction(move |t| -> AppResult<CheckoutResponse> {
                let cart_lines = t.cart_lines_for(&scope);
                if cart_lines.is_empty() {
                    return Err(AppError::new(ErrorCode::EmptyOrder));
                }

                let now = Utc::now();
                let local_time = chrono::Local::now().time();

                // Materialize order lines from the cart snapshots
                let mut lines = Vec::with_capacity(cart_lines.len());
                let mut subtotal = Decimal::ZERO;
                for cart_line in &cart_lines {
                    let product = t
                        .product(cart_line.product_id)
                        .map_err(|_| AppError::new(ErrorCode::ProductNotFound))?
                        .clone();

                    let size = match &cart_line.size {
                        Some(code) => Some(
                            t.size_by_code(code)
                                .ok_or_else(|| AppError::new(ErrorCode::SizeNotFound))?
                                .clone(),
                        ),
                        None => None,
                    };
                    let mut toppings = Vec::with_capacity(cart_line.toppings.len());
                    for topping_id in &cart_line.toppings {
                        let topping = t
                            .topping(*topping_id)
                            .map_err(|_| AppError::new(ErrorCode::ToppingNotFound))?;
                        toppings.push(topping.clone());
                    }
                    let topping_names = toppings.iter().map(|tp| tp.name.clone()).collect();

                    // Authoritative price at order time, not the cart snapshot
                    let unit_price = pricing.unit_price(&product, size.as_ref(), &toppings);
                    let unit_price = pricing.adjusted_unit_price(strategy, unit_price, local_time);
                    let total_price = pricing.line_total(unit_price, cart_line.quantity)?;
                    subtotal += total_price;

                    lines.push(OrderLine {
                        id: 0, // assigned on insert
                        order_id: 0,
                        product_id: product.id,
                        product_name: product.name.clone(),
                        image_url: product.image_url.clone(),
                        unit_price,
                        quantity: cart_line.quantity,
                        size: cart_line.size.clone(),
                        sugar_level: cart_line.sugar_level.clone(),
                        ice_level: cart_line.ice_level.clone(),
                        toppings: topping_names,
                        total_price,
                    });
                }

                let mut shipping_fee = pricing.shipping_fee(subtotal);
                let mut discount = Decimal::ZERO;
                let mut voucher_message = None;
                if let Some(code) = req
                    .voucher_code
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                {
                    match vouchers.resolve(code) {
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
                            voucher_message =
                                Some("Voucher code not recognized".to_string());
                        }
                    }
                }

                let order_id = t.allocate_id();
                let order = Order {
                    id: order_id,
                    order_number: generate_order_number(),
                    user_id,
                    order_date: now,
                    status: OrderStatus::Pending,
                    payment_method: req.payment_method,
                    payment_status: PaymentStatus::Pending,
                    customer_name: req.customer_name.clone(),
                    customer_phone: req.customer_phone.clone(),
                    customer_email: req.customer_email.clone(),
                    shipping_address: req.shipping_address.clone(),
                    notes: req.notes.clone(),
                    subtotal,
                    shipping_fee,
                    discount,
                    total: subtotal + shipping_fee - discount,
                };
                t.orders.insert(order_id, order.clone());

                for line in &mut lines {
                    let line_id = t.allocate_id();
                    line.id = line_id;
                    line.order_id = order_id;
                    t.order_lines.insert(line_id, line.clone());
                }

                // Checkout consumes the cart
                t.cart_lines
                    .retain(|_, line| line.scope().as_ref() != Some(&scope));

                Ok(CheckoutResponse {
                    order,
                    lines,
                    voucher_message,
                })
            })
            .await?;

        audit_log!(
            actor.as_str(),
            "create",
            format!("order:{}", response.order.order_number).as_str(),
            format!("total {}", response.order.total).as_str()
        );
        Ok(response)
    }

    /// Load one order with its lines, ownership-checked
    pub async fn get_order(&self, ctx: &OwnershipContext, order_id: i64) -> AppResult<OrderDetail> {
        let detail = self
            .store
            .read(|t| {
                t.order(order_id)
                    .map(|order| OrderDetail {
                        order: order.clone(),
                        lines: t.order_lines_for(order_id),
                    })
            })
            .await
            .map_err(|_| AppError::new(ErrorCode::OrderNotFound))?;

        OwnershipGuard::authorize_single(ctx, "order", order_id, detail.order.user_id)?;
        Ok(detail)
    }

    /// List orders visible to the caller, newest first
    pub async fn list_orders(&self, ctx: &OwnershipContext) -> AppResult<Vec<Order>> {
        let filter = OwnershipGuard::scope_filter(ctx)?;
        let mut orders = self
            .store
            .read(|t| {
                t.orders
                    .values()
                    .filter(|order| match filter {
                        ScopeFilter::All => true,
                        ScopeFilter::Owner(id) => order.user_id == Some(id),
                    })
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await;
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    /// Admin fulfillment-status change, adjacency enforced
    pub async fn update_status(
        &self,
        ctx: &OwnershipContext,
        order_id: i64,
        next: OrderStatus,
    ) -> AppResult<Order> {
        OwnershipGuard::require_admin(ctx)?;

        let actor = ctx.actor();
        let order = self
            .store
            .transaction(move |t| -> AppResult<Order> {
                let order = t
                    .orders
                    .get_mut(&order_id)
                    .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
                if !order.status.can_transition_to(next) {
                    return Err(
                        AppError::new(ErrorCode::InvalidStatusTransition)
                            .with_detail("from", order.status.to_string())
                            .with_detail("to", next.to_string()),
                    );
                }
                order.status = next;
                Ok(order.clone())
            })
            .await?;

        audit_log!(
            actor.as_str(),
            "update_status",
            format!("order:{}", order.id).as_str(),
            format!("-> {}", order.status).as_str()
        );
        Ok(order)
    }

    /// Admin payment-status change
    pub async fn update_payment_status(
        &self,
        ctx: &OwnershipContext,
        order_id: i64,
        next: PaymentStatus,
    ) -> AppResult<Order> {
        OwnershipGuard::require_admin(ctx)?;

        let actor = ctx.actor();
        let order = self
            .store
            .transaction(move |t| -> AppResult<Order> {
                let order = t
                    .orders
                    .get_mut(&order_id)
                    .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
                if !order.payment_status.can_transition_to(next) {
                    return Err(AppError::new(ErrorCode::InvalidPaymentTransition));
                }
                order.payment_status = next;
                Ok(order.clone())
            })
            .await?;

        audit_log!(
            actor.as_str(),
            "update_payment_status",
            format!("order:{}", order.id).as_str()
        );
        Ok(order)
    }
}

/// Time-derived, collision-free order number
///
/// `ORD` + UTC timestamp + 6 random hex chars. The random suffix keeps
/// two checkouts within the same second distinct.
fn generate_order_number() -> String {
    let stamp = Utc::now().format("%Y%m%d%H%M%S");
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect::<String>()
        .to_ascii_uppercase();
    format!("ORD{stamp}{suffix}")
}
