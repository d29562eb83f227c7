//! In-memory transactional store
//!
//! All tables live behind one `RwLock`. A transaction takes the write
//! lock, clones the tables, applies the closure to the clone and swaps
//! it in only when the closure succeeds. A failing closure therefore
//! leaves no partial writes behind.

use std::collections::BTreeMap;
use std::sync::Arc;

use shared::models::{
    CartLine, CartScope, Category, Order, OrderLine, Product, Size, Topping, User,
};
use tokio::sync::RwLock;

use super::{StoreError, StoreResult};

/// All tables plus the shared id allocator
#[derive(Debug, Clone, Default)]
pub struct Tables {
    next_id: i64,
    pub products: BTreeMap<i64, Product>,
    pub categories: BTreeMap<i64, Category>,
    pub sizes: BTreeMap<i64, Size>,
    pub toppings: BTreeMap<i64, Topping>,
    pub cart_lines: BTreeMap<i64, CartLine>,
    pub orders: BTreeMap<i64, Order>,
    pub order_lines: BTreeMap<i64, OrderLine>,
    pub users: BTreeMap<i64, User>,
}

impl Tables {
    /// Next id from the shared sequence
    pub fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Bump the sequence past an explicitly assigned id (seed data)
    pub fn reserve_id(&mut self, id: i64) {
        if id > self.next_id {
            self.next_id = id;
        }
    }

    // ==================== Lookups ====================

    pub fn product(&self, id: i64) -> StoreResult<&Product> {
        self.products.get(&id).ok_or(StoreError::NotFound("product"))
    }

    pub fn category(&self, id: i64) -> StoreResult<&Category> {
        self.categories
            .get(&id)
            .ok_or(StoreError::NotFound("category"))
    }

    pub fn size_by_code(&self, code: &str) -> Option<&Size> {
        self.sizes.values().find(|s| s.code.eq_ignore_ascii_case(code))
    }

    pub fn topping(&self, id: i64) -> StoreResult<&Topping> {
        self.toppings.get(&id).ok_or(StoreError::NotFound("topping"))
    }

    pub fn order(&self, id: i64) -> StoreResult<&Order> {
        self.orders.get(&id).ok_or(StoreError::NotFound("order"))
    }

    /// Cart lines belonging to one scope, oldest first
    pub fn cart_lines_for(&self, scope: &CartScope) -> Vec<CartLine> {
        self.cart_lines
            .values()
            .filter(|line| line.scope().as_ref() == Some(scope))
            .cloned()
            .collect()
    }

    /// Lines of one order, in insertion order
    pub fn order_lines_for(&self, order_id: i64) -> Vec<OrderLine> {
        self.order_lines
            .values()
            .filter(|line| line.order_id == order_id)
            .cloned()
            .collect()
    }

    // ==================== Mutations with integrity rules ====================

    /// Insert a category; the slug must be unique
    pub fn insert_category(&mut self, category: Category) -> StoreResult<()> {
        let slug_taken = self.categories.values().any(|c| c.slug == category.slug);
        if slug_taken {
            return Err(StoreError::Duplicate("category slug"));
        }
        self.categories.insert(category.id, category);
        Ok(())
    }

    /// Delete a category; refused while products still reference it
    pub fn delete_category(&mut self, id: i64) -> StoreResult<Category> {
        if !self.categories.contains_key(&id) {
            return Err(StoreError::NotFound("category"));
        }
        let in_use = self.products.values().any(|p| p.category_id == id);
        if in_use {
            return Err(StoreError::Conflict(
                "category still has products assigned".to_string(),
            ));
        }
        self.categories
            .remove(&id)
            .ok_or(StoreError::NotFound("category"))
    }
}

/// Shared handle to the store
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only closure against the tables
    pub async fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        let tables = self.inner.read().await;
        f(&tables)
    }

    /// Run a mutating closure transactionally
    ///
    /// The closure works on a clone of the tables. On `Ok` the clone is
    /// swapped in; on `Err` it is discarded and the store is untouched.
    /// The error type is the caller's, so services can abort with their
    /// own domain errors.
    pub async fn transaction<R, E>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<R, E>,
    ) -> Result<R, E> {
        let mut guard = self.inner.write().await;
        let mut draft = guard.clone();
        let result = f(&mut draft)?;
        *guard = draft;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn make_product(id: i64, category_id: i64) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            description: None,
            base_price: Decimal::from(35_000),
            category_id,
            image_url: None,
            is_available: true,
            owner_id: 1,
            created_at: Utc::now(),
        }
    }

    fn make_category(id: i64) -> Category {
        Category {
            id,
            name: format!("Category {id}"),
            slug: format!("category-{id}"),
            display_order: id as i32,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn transaction_commits_all_writes() {
        let store = MemoryStore::new();
        store
            .transaction(|t| -> StoreResult<()> {
                let cat_id = t.allocate_id();
                t.categories.insert(cat_id, make_category(cat_id));
                let prod_id = t.allocate_id();
                t.products.insert(prod_id, make_product(prod_id, cat_id));
                Ok(())
            })
            .await
            .unwrap();

        store
            .read(|t| {
                assert_eq!(t.categories.len(), 1);
                assert_eq!(t.products.len(), 1);
            })
            .await;
    }

    #[tokio::test]
    async fn failed_transaction_leaves_no_partial_writes() {
        let store = MemoryStore::new();
        let result: StoreResult<()> = store
            .transaction(|t| {
                let id = t.allocate_id();
                t.categories.insert(id, make_category(id));
                Err(StoreError::NotFound("product"))
            })
            .await;

        assert!(result.is_err());
        store
            .read(|t| {
                assert!(t.categories.is_empty());
            })
            .await;
    }

    #[tokio::test]
    async fn delete_category_is_refused_while_in_use() {
        let store = MemoryStore::new();
        store
            .transaction(|t| -> StoreResult<()> {
                t.categories.insert(1, make_category(1));
                t.products.insert(2, make_product(2, 1));
                t.reserve_id(2);
                Ok(())
            })
            .await
            .unwrap();

        let err = store.transaction(|t| t.delete_category(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Remove the product, then deletion succeeds
        store
            .transaction(|t| {
                t.products.remove(&2);
                t.delete_category(1)
            })
            .await
            .unwrap();
    }

    #[test]
    fn duplicate_category_slug_is_refused() {
        let mut tables = Tables::default();
        tables.insert_category(make_category(1)).unwrap();

        let mut duplicate = make_category(2);
        duplicate.slug = "category-1".to_string();
        let err = tables.insert_category(duplicate).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn ids_are_monotonic_across_transactions() {
        let store = MemoryStore::new();
        let a = store
            .transaction(|t| -> StoreResult<i64> { Ok(t.allocate_id()) })
            .await
            .unwrap();
        let b = store
            .transaction(|t| -> StoreResult<i64> { Ok(t.allocate_id()) })
            .await
            .unwrap();
        assert!(b > a);
    }
}
