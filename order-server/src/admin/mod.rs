//! Admin access layer
//!
//! Catalog management, customer listings and the dashboard. Every
//! record-level operation loads the record first and passes it through
//! the ownership guard; list queries are narrowed with a scope filter
//! before anything leaves the store.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{
    Category, CategoryCreate, Order, OrderStatus, Product, ProductCreate, ProductUpdate, Role,
    User,
};
use shared::{AppError, AppResult, ErrorCode};
use std::collections::HashMap;

use crate::audit_log;
use crate::auth::{OwnershipContext, OwnershipGuard, ScopeFilter};
use crate::core::ServerState;
use crate::db::{MemoryStore, StoreError, Tables};

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;
const DEFAULT_TOP_PRODUCTS: usize = 5;

/// Customer row with aggregated order history
#[derive(Debug, Clone, Serialize)]
pub struct CustomerSummary {
    #[serde(flatten)]
    pub user: User,
    pub order_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
}

/// Best-selling product
#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub product_id: i64,
    pub product_name: String,
    pub quantity_sold: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

/// Reporting window for dashboard figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    #[default]
    Today,
    /// Rolling 7 days
    Week,
    /// Rolling 30 days
    Month,
}

impl StatsPeriod {
    fn contains(self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::Today => at.date_naive() == now.date_naive(),
            Self::Week => at >= now - Duration::days(7),
            Self::Month => at >= now - Duration::days(30),
        }
    }
}

/// Dashboard snapshot
///
/// Revenue counts every order that was not cancelled.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub period: StatsPeriod,
    pub total_orders: usize,
    pub pending_orders: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub period_orders: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub period_revenue: Decimal,
    pub total_customers: usize,
    pub top_products: Vec<TopProduct>,
}

/// Admin order-list filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub status: Option<OrderStatus>,
    pub user_id: Option<i64>,
}

/// One page of orders, newest first
#[derive(Debug, Clone, Serialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Ownership-guarded admin operations
#[derive(Clone)]
pub struct AdminAccessLayer {
    store: MemoryStore,
}

impl AdminAccessLayer {
    pub fn new(state: &ServerState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    // ==================== Products ====================

    /// Products visible to the caller
    ///
    /// Admins see the whole catalog, everyone else only products they
    /// created.
    pub async fn list_products(&self, ctx: &OwnershipContext) -> AppResult<Vec<Product>> {
        let filter = OwnershipGuard::scope_filter(ctx)?;
        let products = self
            .store
            .read(|t| {
                t.products
                    .values()
                    .filter(|p| match filter {
                        ScopeFilter::All => true,
                        ScopeFilter::Owner(id) => p.owner_id == id,
                    })
                    .cloned()
                    .collect()
            })
            .await;
        Ok(products)
    }

    pub async fn get_product(&self, ctx: &OwnershipContext, id: i64) -> AppResult<Product> {
        let product = self
            .store
            .read(|t| t.product(id).cloned())
            .await
            .map_err(|_| AppError::new(ErrorCode::ProductNotFound))?;
        OwnershipGuard::authorize_single(ctx, "product", id, Some(product.owner_id))?;
        Ok(product)
    }

    /// Create a product, stamping the caller as its owner
    ///
    /// The owner comes from the identity context, never from the
    /// payload, so it cannot be spoofed.
    pub async fn create_product(
        &self,
        ctx: &OwnershipContext,
        req: ProductCreate,
    ) -> AppResult<Product> {
        let Some(owner_id) = ctx.user_id else {
            return Err(AppError::not_authenticated());
        };
        if req.base_price < Decimal::ZERO {
            return Err(AppError::validation("Base price cannot be negative"));
        }

        let actor = ctx.actor();
        let product = self
            .store
            .transaction(move |t| -> AppResult<Product> {
                t.category(req.category_id)
                    .map_err(|_| AppError::new(ErrorCode::CategoryNotFound))?;

                let id = t.allocate_id();
                let product = Product {
                    id,
                    name: req.name,
                    description: req.description,
                    base_price: req.base_price,
                    category_id: req.category_id,
                    image_url: req.image_url,
                    is_available: req.is_available,
                    owner_id,
                    created_at: Utc::now(),
                };
                t.products.insert(id, product.clone());
                Ok(product)
            })
            .await?;

        audit_log!(
            actor.as_str(),
            "create",
            format!("product:{}", product.id).as_str()
        );
        Ok(product)
    }

    /// Partial update; `owner_id` is immutable
    pub async fn update_product(
        &self,
        ctx: &OwnershipContext,
        id: i64,
        req: ProductUpdate,
    ) -> AppResult<Product> {
        let current = self.get_product(ctx, id).await?;
        if req.base_price.is_some_and(|p| p < Decimal::ZERO) {
            return Err(AppError::validation("Base price cannot be negative"));
        }

        let actor = ctx.actor();
        let product = self
            .store
            .transaction(move |t| -> AppResult<Product> {
                if let Some(category_id) = req.category_id {
                    t.category(category_id)
                        .map_err(|_| AppError::new(ErrorCode::CategoryNotFound))?;
                }
                let product = t
                    .products
                    .get_mut(&current.id)
                    .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

                if let Some(name) = req.name {
                    product.name = name;
                }
                if let Some(description) = req.description {
                    product.description = Some(description);
                }
                if let Some(base_price) = req.base_price {
                    product.base_price = base_price;
                }
                if let Some(category_id) = req.category_id {
                    product.category_id = category_id;
                }
                if let Some(image_url) = req.image_url {
                    product.image_url = Some(image_url);
                }
                if let Some(is_available) = req.is_available {
                    product.is_available = is_available;
                }
                Ok(product.clone())
            })
            .await?;

        audit_log!(
            actor.as_str(),
            "update",
            format!("product:{}", product.id).as_str()
        );
        Ok(product)
    }

    pub async fn delete_product(&self, ctx: &OwnershipContext, id: i64) -> AppResult<()> {
        // Load first so the guard can compare against the real owner
        self.get_product(ctx, id).await?;

        let actor = ctx.actor();
        self.store
            .transaction(move |t| -> AppResult<()> {
                t.products
                    .remove(&id)
                    .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
                Ok(())
            })
            .await?;

        audit_log!(actor.as_str(), "delete", format!("product:{id}").as_str());
        Ok(())
    }

    // ==================== Categories ====================

    /// Active categories, in display order (public)
    pub async fn list_categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .store
            .read(|t| t.categories.values().cloned().collect())
            .await;
        categories.sort_by_key(|c| (c.display_order, c.id));
        categories
    }

    pub async fn create_category(
        &self,
        ctx: &OwnershipContext,
        req: CategoryCreate,
    ) -> AppResult<Category> {
        OwnershipGuard::require_admin(ctx)?;

        let actor = ctx.actor();
        let category = self
            .store
            .transaction(move |t| -> AppResult<Category> {
                let id = t.allocate_id();
                let category = Category {
                    id,
                    name: req.name,
                    slug: req.slug,
                    display_order: req.display_order,
                    is_active: true,
                    created_at: Utc::now(),
                };
                t.insert_category(category.clone())?;
                Ok(category)
            })
            .await?;

        audit_log!(
            actor.as_str(),
            "create",
            format!("category:{}", category.id).as_str()
        );
        Ok(category)
    }

    /// Delete a category; refused while products still reference it
    pub async fn delete_category(&self, ctx: &OwnershipContext, id: i64) -> AppResult<()> {
        OwnershipGuard::require_admin(ctx)?;

        let actor = ctx.actor();
        self.store
            .transaction(move |t| -> AppResult<()> {
                t.delete_category(id).map_err(|e| match e {
                    StoreError::NotFound(_) => AppError::new(ErrorCode::CategoryNotFound),
                    _ => AppError::new(ErrorCode::CategoryInUse),
                })?;
                Ok(())
            })
            .await?;

        audit_log!(actor.as_str(), "delete", format!("category:{id}").as_str());
        Ok(())
    }

    // ==================== Orders ====================

    /// Paged order listing with optional status and customer filters
    /// (admin only)
    pub async fn list_orders(
        &self,
        ctx: &OwnershipContext,
        query: OrderListQuery,
    ) -> AppResult<OrderPage> {
        OwnershipGuard::require_admin(ctx)?;

        let page = query.page.unwrap_or(1).max(1);
        let page_size = query
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let status = query.status;
        let user_id = query.user_id;

        let mut orders: Vec<Order> = self
            .store
            .read(|t| {
                t.orders
                    .values()
                    .filter(|o| status.is_none_or(|s| o.status == s))
                    .filter(|o| user_id.is_none_or(|id| o.user_id == Some(id)))
                    .cloned()
                    .collect()
            })
            .await;
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));

        let total = orders.len();
        let orders: Vec<Order> = orders
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();
        Ok(OrderPage {
            orders,
            total,
            page,
            page_size,
        })
    }

    // ==================== Customers ====================

    /// All customers with their order totals (admin only)
    pub async fn list_customers(&self, ctx: &OwnershipContext) -> AppResult<Vec<CustomerSummary>> {
        OwnershipGuard::require_admin(ctx)?;

        let summaries = self
            .store
            .read(|t| {
                t.users
                    .values()
                    .filter(|u| u.role == Role::Customer)
                    .map(|user| {
                        let orders: Vec<_> = t
                            .orders
                            .values()
                            .filter(|o| {
                                o.user_id == Some(user.id) && o.status != OrderStatus::Cancelled
                            })
                            .collect();
                        CustomerSummary {
                            user: user.clone(),
                            order_count: orders.len(),
                            total_spent: orders.iter().map(|o| o.total).sum(),
                        }
                    })
                    .collect()
            })
            .await;
        Ok(summaries)
    }

    // ==================== Dashboard ====================

    /// Aggregate sales snapshot for a reporting window (admin only)
    pub async fn dashboard(
        &self,
        ctx: &OwnershipContext,
        period: StatsPeriod,
    ) -> AppResult<DashboardStats> {
        OwnershipGuard::require_admin(ctx)?;

        let now = Utc::now();
        let stats = self
            .store
            .read(|t| {
                let live = |status: OrderStatus| status != OrderStatus::Cancelled;

                let total_orders = t.orders.len();
                let pending_orders = t
                    .orders
                    .values()
                    .filter(|o| o.status == OrderStatus::Pending)
                    .count();
                let total_revenue = t
                    .orders
                    .values()
                    .filter(|o| live(o.status))
                    .map(|o| o.total)
                    .sum();
                let period_orders = t
                    .orders
                    .values()
                    .filter(|o| period.contains(o.order_date, now))
                    .count();
                let period_revenue = t
                    .orders
                    .values()
                    .filter(|o| live(o.status) && period.contains(o.order_date, now))
                    .map(|o| o.total)
                    .sum();
                let total_customers = t
                    .users
                    .values()
                    .filter(|u| u.role == Role::Customer)
                    .count();

                DashboardStats {
                    period,
                    total_orders,
                    pending_orders,
                    total_revenue,
                    period_orders,
                    period_revenue,
                    total_customers,
                    top_products: top_products_in(t, DEFAULT_TOP_PRODUCTS),
                }
            })
            .await;
        Ok(stats)
    }

    /// Best sellers across non-cancelled orders (admin only)
    pub async fn top_products(
        &self,
        ctx: &OwnershipContext,
        limit: usize,
    ) -> AppResult<Vec<TopProduct>> {
        OwnershipGuard::require_admin(ctx)?;

        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        Ok(self.store.read(|t| top_products_in(t, limit)).await)
    }
}

/// Sales per product by quantity sold, highest first
fn top_products_in(t: &Tables, limit: usize) -> Vec<TopProduct> {
    let mut by_product: HashMap<i64, TopProduct> = HashMap::new();
    for line in t.order_lines.values() {
        let counted = t
            .orders
            .get(&line.order_id)
            .is_some_and(|o| o.status != OrderStatus::Cancelled);
        if !counted {
            continue;
        }
        let entry = by_product
            .entry(line.product_id)
            .or_insert_with(|| TopProduct {
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity_sold: 0,
                revenue: Decimal::ZERO,
            });
        entry.quantity_sold += u64::from(line.quantity);
        entry.revenue += line.total_price;
    }
    let mut top: Vec<TopProduct> = by_product.into_values().collect();
    top.sort_by(|a, b| {
        b.quantity_sold
            .cmp(&a.quantity_sold)
            .then(b.revenue.cmp(&a.revenue))
    });
    top.truncate(limit);
    top
}
